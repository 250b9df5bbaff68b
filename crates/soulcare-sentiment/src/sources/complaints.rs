use soulcare_core::Complaint;

use super::{AUTHOR_COLUMN, TEXT_COLUMN};
use crate::types::ComplaintRecord;

/// Convert stored complaints into pipeline records, preserving order.
#[must_use]
pub fn records_from_complaints(complaints: &[Complaint]) -> Vec<ComplaintRecord> {
    complaints
        .iter()
        .map(|c| {
            ComplaintRecord::new(vec![
                (AUTHOR_COLUMN.to_string(), c.name.clone()),
                (TEXT_COLUMN.to_string(), c.description.clone()),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn maps_name_and_description_in_order() {
        let complaints = vec![
            Complaint {
                id: 1,
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                description: "demorou".to_string(),
                created_at: Utc::now(),
            },
            Complaint {
                id: 2,
                name: "Beto".to_string(),
                email: "beto@example.com".to_string(),
                description: "😡".to_string(),
                created_at: Utc::now(),
            },
        ];

        let records = records_from_complaints(&complaints);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(AUTHOR_COLUMN), Some("Ana"));
        assert_eq!(records[1].get(TEXT_COLUMN), Some("😡"));
        assert_eq!(records[0].get("email"), None);
    }
}
