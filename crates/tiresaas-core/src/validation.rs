//! # Validation Module
//!
//! Input validation utilities for TireSaaS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen form                                                  │
//! │  ├── Numeric inputs, required markers                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Business rule validation                                          │
//! │  └── Called by SaleBuilder and repositories before any mutation        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repositories                                                 │
//! │  └── Uniqueness of codes and emails                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tiresaas_core::validation::{validate_product_code, validate_quantity};
//!
//! assert!(validate_product_code("7891234567890").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_LINES, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code (barcode or internal reference).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("product"));
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "product".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required free-text field such as a buyer or store name.
///
/// ## Returns
/// The trimmed value.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Normalizes an optional lot identifier.
///
/// Blank input means "no lot". A present lot is trimmed and limited to
/// 30 characters.
pub fn normalize_lot(lot: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(lot) = lot.map(str::trim).filter(|l| !l.is_empty()) else {
        return Ok(None);
    };

    if lot.len() > 30 {
        return Err(ValidationError::TooLong {
            field: "lot".to_string(),
            max: 30,
        });
    }

    Ok(Some(lot.to_string()))
}

/// Validates an email address shape (`local@domain.tld`).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Sale Entry Flow
/// ```text
/// Seller enters quantity: 4
///      │
///      ▼
/// validate_quantity(4) ← THIS FUNCTION
///      │
///      ├── qty <= 0?  → "quantity must be positive"
///      ├── qty > 999? → "quantity must be between 1 and 999"
///      └── OK → SaleBuilder::add_line_item continues
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates that an amount is zero or more.
///
/// Zero is allowed: free items and cost-less samples exist.
///
/// ## Example
/// ```rust
/// use tiresaas_core::money::Money;
/// use tiresaas_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("unit price", Money::from_cents(0)).is_ok());
/// assert!(validate_non_negative("unit price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount against `[0, max_cents]`.
pub fn validate_amount(field: &str, amount: Money, max_cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, amount)?;

    if amount.cents() > max_cents {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: max_cents,
        });
    }

    Ok(())
}

/// Validates a unit price or unit cost.
///
/// ## Example
/// ```rust
/// use tiresaas_core::money::Money;
/// use tiresaas_core::validation::validate_unit_amount;
///
/// assert!(validate_unit_amount("unit price", Money::from_cents(25000)).is_ok());
/// assert!(validate_unit_amount("unit price", Money::from_cents(100_000_001)).is_err());
/// ```
pub fn validate_unit_amount(field: &str, amount: Money) -> ValidationResult<()> {
    validate_amount(field, amount, MAX_UNIT_PRICE_CENTS)
}

/// Validates a discount against the amount it reduces.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed `limit` (e.g. quantity × unit price)
pub fn validate_discount(field: &str, discount: Money, limit: Money) -> ValidationResult<()> {
    validate_non_negative(field, discount)?;

    if discount > limit {
        return Err(ValidationError::DiscountTooLarge {
            field: field.to_string(),
            discount_cents: discount.cents(),
            limit_cents: limit.cents(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the draft.
pub fn validate_line_count(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "sale lines".to_string(),
            min: 0,
            max: MAX_SALE_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("7891234567890").is_ok());
        assert!(validate_product_code("PNEU-195-65").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"7".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_required_text() {
        assert_eq!(
            validate_required_text("buyer", "  Carlos  ", 120).unwrap(),
            "Carlos"
        );
        assert!(validate_required_text("buyer", "", 120).is_err());
        assert!(validate_required_text("buyer", &"a".repeat(121), 120).is_err());
    }

    #[test]
    fn test_normalize_lot() {
        assert_eq!(normalize_lot(None).unwrap(), None);
        assert_eq!(normalize_lot(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_lot(Some(" L240115 ")).unwrap(),
            Some("L240115".to_string())
        );
        assert!(normalize_lot(Some(&"L".repeat(31))).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("maria@tiresaas.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("maria").is_err());
        assert!(validate_email("@tiresaas.com").is_err());
        assert!(validate_email("maria@tiresaas").is_err());
        assert!(validate_email("maria@.com").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_discount() {
        let limit = Money::from_cents(50000);
        assert!(validate_discount("discount", Money::zero(), limit).is_ok());
        assert!(validate_discount("discount", limit, limit).is_ok());
        assert!(validate_discount("discount", Money::from_cents(50001), limit).is_err());
        assert!(validate_discount("discount", Money::from_cents(-1), limit).is_err());
    }

    #[test]
    fn test_validate_unit_amount() {
        assert!(validate_unit_amount("unit price", Money::zero()).is_ok());
        assert!(validate_unit_amount("unit price", Money::from_cents(MAX_UNIT_PRICE_CENTS)).is_ok());

        assert!(matches!(
            validate_unit_amount("unit price", Money::from_cents(MAX_UNIT_PRICE_CENTS + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_unit_amount("unit cost", Money::from_cents(-1)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_line_count() {
        assert!(validate_line_count(0).is_ok());
        assert!(validate_line_count(MAX_SALE_LINES - 1).is_ok());
        assert!(validate_line_count(MAX_SALE_LINES).is_err());
    }
}
