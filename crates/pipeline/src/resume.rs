//! Resume-point detection from persisted grids.

use lisagg_calendar::Frequency;

use crate::store::Listing;

/// Coarsest persisted resolution the chain for `name` can continue from.
///
/// Checks yearly, then monthly, then (for six-hourly native output only)
/// daily. `Some(Yearly)` means the variable is done. `None` means start
/// from the native grid.
pub fn resume_point<L: Listing + ?Sized>(
    name: &str,
    listing: &L,
    native: Frequency,
) -> Option<Frequency> {
    let mut candidates = vec![Frequency::Yearly, Frequency::Monthly];
    if native == Frequency::SixHourly {
        candidates.push(Frequency::Daily);
    }
    candidates.into_iter().find(|&f| listing.has_grid(f, name))
}
