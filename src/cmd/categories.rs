use crate::domain::category::CategoryCode;
use crate::error::AppResult;

/// Prints the category registry, the same mapping the triage rules route
/// tickets into.
pub fn run() -> AppResult<()> {
    println!("Categorías de ticket disponibles:");
    for category in CategoryCode::ALL {
        println!("  {:>6}  {}", category.issue_type_id(), category.label());
    }
    Ok(())
}
