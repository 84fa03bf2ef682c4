//! Quotient familial share count.
//!
//! | Household member                | Shares |
//! |---------------------------------|--------|
//! | Single taxpayer                 | 1      |
//! | Couple                          | 2      |
//! | First and second child, each    | 0.5    |
//! | Third and later children, each  | 1      |
//! | Single parent (at least 1 child)| +0.5   |

use rust_decimal::Decimal;

/// Number of shares the household income is divided by.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use impot_core::get_shares;
///
/// assert_eq!(get_shares(false, 0), dec!(1));
/// assert_eq!(get_shares(true, 3), dec!(4));
/// assert_eq!(get_shares(false, 2), dec!(2.5));
/// ```
pub fn get_shares(
    is_in_couple: bool,
    children: u32,
) -> Decimal {
    let half = Decimal::new(5, 1);
    let mut shares = if is_in_couple {
        Decimal::TWO
    } else {
        Decimal::ONE
    };

    let first_two = children.min(2);
    let others = children - first_two;
    shares += half * Decimal::from(first_two);
    shares += Decimal::from(others);

    if !is_in_couple && children > 0 {
        shares += half;
    }

    shares.normalize()
}
