//! Input validation rules.
//!
//! Each function validates one field and returns `Ok(())` or the
//! specific [`ValidationError`]. Handlers call these before touching
//! the database, so every rule here is enforced for every RPC input.
//! String fields are trimmed before length checks; passwords are the
//! exception because leading and trailing spaces are legal there.

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_ITEMS};

/// Minimum username length
pub const MIN_USERNAME_LEN: usize = 3;
/// Maximum username length
pub const MAX_USERNAME_LEN: usize = 50;
/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;
/// Maximum password length
pub const MAX_PASSWORD_LEN: usize = 128;
/// Maximum email length
pub const MAX_EMAIL_LEN: usize = 254;
/// Maximum product name length
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
/// Maximum barcode length
pub const MAX_BARCODE_LEN: usize = 100;
/// Maximum stock adjustment reason length
pub const MAX_REASON_LEN: usize = 500;
/// Maximum tax rate: 100% in basis points
pub const MAX_TAX_RATE_BPS: u32 = 10_000;
/// Maximum accepted cent amount: $999,999,999.99.
/// Keeps sale totals (at most 100 lines of 999 units each) well inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999_999;

/// Validate a username: trimmed, 3 to 50 characters
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("username"));
    }
    if trimmed.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: MIN_USERNAME_LEN,
        });
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }
    Ok(())
}

/// Validate an email address.
///
/// Plausibility check only: something before the `@`, and a dot
/// somewhere in the domain part. Real verification happens when a
/// mail is actually sent, not here.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("email"));
    }
    if trimmed.chars().count() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(ValidationError::invalid_format("email", "missing @"));
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') {
        return Err(ValidationError::invalid_format(
            "email",
            "malformed address",
        ));
    }
    Ok(())
}

/// Validate a password: 8 to 128 characters, not trimmed
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validate a product name: trimmed, 1 to 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("name"));
    }
    if trimmed.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a barcode, if present: trimmed, at most 100 characters.
///
/// Callers normalize empty strings to `None` before storage; an empty
/// barcode is therefore legal input and means "no barcode".
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    if barcode.trim().chars().count() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }
    Ok(())
}

/// Validate a line-item quantity: positive, at most 999
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validate a cent amount that must be strictly positive
pub fn validate_positive_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validate a cent amount that must not be negative
pub fn validate_non_negative_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validate a stock count or threshold: must not be negative
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validate a tax rate in basis points: at most 100%
pub fn validate_tax_rate(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate_bps".to_string(),
            min: 0,
            max: MAX_TAX_RATE_BPS as i64,
        });
    }
    Ok(())
}

/// Validate a stock adjustment reason: trimmed, 1 to 500 characters
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("reason"));
    }
    if trimmed.chars().count() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }
    Ok(())
}

/// Validate an entity id reference: must be non-blank
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validate the shape of a sale's item list: 1 to 100 lines
pub fn validate_sale_item_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::EmptySale);
    }
    if count > MAX_SALE_ITEMS {
        return Err(ValidationError::TooManyItems {
            max: MAX_SALE_ITEMS,
        });
    }
    Ok(())
}
