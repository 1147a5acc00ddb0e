//! Demonstration data for the `seed` subcommand.
//!
//! Writes a small, deterministic catalog of programs, attribute definitions,
//! and tracked-entity instances into a storage backend so the screen has
//! something to search on first run.

use crate::domain::entity::{Program, TrackedEntityAttribute, TrackedEntityInstance, ValueType};
use crate::domain::error::Result;
use crate::storage::backend::Storage;

/// Counts of what a seeding run stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub programs: usize,
    pub attributes: usize,
    pub instances: usize,
}

/// Seeds the given backend with the demonstration catalog.
///
/// Existing entries with the same ids are replaced, so seeding is idempotent.
/// Instance `last_updated` stamps step backwards one hour per instance from
/// the current time, which keeps the recency ordering stable between runs.
///
/// # Errors
///
/// Returns an error if any write to the backend fails.
pub fn seed_demo_data(storage: &mut dyn Storage) -> Result<SeedSummary> {
    let _span = tracing::debug_span!("seed_demo_data").entered();

    let attributes = demo_attributes();
    for attribute in &attributes {
        storage.put_attribute(attribute)?;
    }

    let programs = demo_programs();
    for program in &programs {
        storage.put_program(program)?;
    }

    let instances = demo_instances();
    let stored = storage.put_instances_batch(&instances)?;

    tracing::debug!(
        programs = programs.len(),
        attributes = attributes.len(),
        instances = stored,
        "demo data seeded"
    );

    Ok(SeedSummary {
        programs: programs.len(),
        attributes: attributes.len(),
        instances: stored,
    })
}

fn demo_attributes() -> Vec<TrackedEntityAttribute> {
    vec![
        TrackedEntityAttribute::new("first-name", "First name", ValueType::Text),
        TrackedEntityAttribute::new("last-name", "Last name", ValueType::Text),
        TrackedEntityAttribute::new("date-of-birth", "Date of birth", ValueType::Date),
        TrackedEntityAttribute::new("phone", "Phone number", ValueType::Number),
        TrackedEntityAttribute::with_options(
            "gender",
            "Gender",
            vec!["Female".to_string(), "Male".to_string()],
        ),
    ]
}

fn demo_programs() -> Vec<Program> {
    vec![
        Program::new(
            "prog-mch",
            "Maternal and Child Health",
            vec![
                "first-name".to_string(),
                "last-name".to_string(),
                "date-of-birth".to_string(),
                "phone".to_string(),
            ],
        ),
        Program::new(
            "prog-tb",
            "TB Control",
            vec![
                "first-name".to_string(),
                "last-name".to_string(),
                "date-of-birth".to_string(),
            ],
        ),
        Program::new(
            "prog-imm",
            "Immunisation",
            vec![
                "first-name".to_string(),
                "last-name".to_string(),
                "date-of-birth".to_string(),
                "gender".to_string(),
            ],
        ),
    ]
}

fn demo_instances() -> Vec<TrackedEntityInstance> {
    let now = chrono::Utc::now().timestamp();

    let rows: Vec<(&str, &str, &str, &str, &str, &str, &str, Vec<&str>)> = vec![
        (
            "tei-0001", "Awino", "Okoth", "1990-02-11", "0712000001", "Female",
            "Nyamira Clinic", vec!["prog-mch"],
        ),
        (
            "tei-0002", "Amina", "Hassan", "1985-06-30", "0712000002", "Female",
            "Kisii District Hospital", vec!["prog-mch", "prog-tb"],
        ),
        (
            "tei-0003", "Brian", "Otieno", "2019-11-03", "0712000003", "Male",
            "Keroka Health Centre", vec!["prog-imm"],
        ),
        (
            "tei-0004", "Cynthia", "Wanjiru", "1978-01-22", "0712000004", "Female",
            "Nyamira Clinic", vec!["prog-tb"],
        ),
        (
            "tei-0005", "David", "Mwangi", "2021-05-17", "0712000005", "Male",
            "Kisii District Hospital", vec!["prog-imm"],
        ),
        (
            "tei-0006", "Esther", "Achieng", "1995-09-09", "0712000006", "Female",
            "Keroka Health Centre", vec!["prog-mch", "prog-imm"],
        ),
        (
            "tei-0007", "Felix", "Kiprop", "1988-12-01", "0712000007", "Male",
            "Nyamira Clinic", vec!["prog-tb"],
        ),
        (
            "tei-0008", "Grace", "Njeri", "2020-03-28", "0712000008", "Female",
            "Kisii District Hospital", vec!["prog-imm", "prog-mch"],
        ),
    ];

    rows.into_iter()
        .enumerate()
        .map(
            |(i, (id, first, last, dob, phone, gender, org_unit, programs))| {
                let mut instance = TrackedEntityInstance::new(id, org_unit);
                instance.programs = programs.into_iter().map(String::from).collect();
                instance
                    .values
                    .insert("first-name".to_string(), first.to_string());
                instance
                    .values
                    .insert("last-name".to_string(), last.to_string());
                instance
                    .values
                    .insert("date-of-birth".to_string(), dob.to_string());
                instance
                    .values
                    .insert("phone".to_string(), phone.to_string());
                instance
                    .values
                    .insert("gender".to_string(), gender.to_string());
                instance.last_updated = now - (i as i64) * 3600;
                instance
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::SearchQuery;
    use crate::storage::json::JsonStorage;

    #[test]
    fn seeding_fills_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("entities.json")).unwrap();

        let summary = seed_demo_data(&mut storage).unwrap();
        assert_eq!(summary.programs, 3);
        assert_eq!(summary.attributes, 5);
        assert_eq!(summary.instances, 8);

        let results = storage.search(&SearchQuery::new(50)).unwrap();
        assert_eq!(results.pager.total, 8);
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("entities.json")).unwrap();

        seed_demo_data(&mut storage).unwrap();
        seed_demo_data(&mut storage).unwrap();

        assert_eq!(storage.programs().unwrap().len(), 3);
        let results = storage.search(&SearchQuery::new(50)).unwrap();
        assert_eq!(results.pager.total, 8);
    }

    #[test]
    fn every_program_attribute_exists_in_the_catalog() {
        let attributes = demo_attributes();
        for program in demo_programs() {
            for id in &program.attribute_ids {
                assert!(
                    attributes.iter().any(|a| &a.id == id),
                    "program {} names unknown attribute {id}",
                    program.id
                );
            }
        }
    }
}
