//! Starter laboratories for a fresh database.

use marie_core::laboratory::CreateLaboratory;

use crate::repositories::LaboratoryRepo;
use crate::DbPool;

/// `(name, description, color, icon)` of each starter laboratory.
const DEFAULT_LABORATORIES: [(&str, &str, &str, &str); 3] = [
    (
        "Getting Started",
        "Your first laboratory to explore Marie's features",
        "#3B82F6",
        "🚀",
    ),
    (
        "Artificial Intelligence",
        "Machine Learning, Deep Learning, and AI applications",
        "#10B981",
        "🤖",
    ),
    (
        "Philosophy",
        "Stoicism, Ethics, and Modern Philosophy",
        "#8B5CF6",
        "🏛️",
    ),
];

/// Insert the starter laboratories when the table is empty.
///
/// Returns how many rows were inserted; `0` when any laboratory already
/// exists, including inactive ones.
pub async fn seed_defaults(pool: &DbPool) -> Result<u64, sqlx::Error> {
    if LaboratoryRepo::count(pool).await? > 0 {
        tracing::debug!("Laboratories present, skipping default seed");
        return Ok(0);
    }

    let mut inserted = 0;
    for (name, description, color, icon) in DEFAULT_LABORATORIES {
        let input = CreateLaboratory {
            description: Some(description.to_string()),
            color: Some(color.to_string()),
            icon: Some(icon.to_string()),
            ..CreateLaboratory::new(name)
        };
        LaboratoryRepo::create(pool, &input).await?;
        inserted += 1;
    }

    tracing::info!(inserted, "Default laboratories created");
    Ok(inserted)
}
