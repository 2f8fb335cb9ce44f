use super::milk::MilkUnit;

/// Milk density used to reconcile litres against kilograms.
pub const KG_PER_LITRE: f64 = 1.03;

/// Converts a milk quantity between litres and kilograms.
///
/// Only milk quantities go through here: feed units are fixed per feed type.
pub fn to_effective_quantity(quantity: f64, from: MilkUnit, to: MilkUnit) -> f64 {
    match (from, to) {
        (MilkUnit::Litre, MilkUnit::Kg) => quantity * KG_PER_LITRE,
        (MilkUnit::Kg, MilkUnit::Litre) => quantity * (1.0 / KG_PER_LITRE),
        _ => quantity,
    }
}
