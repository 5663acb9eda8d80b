//! Expense model ("gasto")
//!
//! Table: expenses

use chrono::{DateTime, NaiveDate, Utc};
use obra_core::traits::{Entity, Id, Identifiable, ProjectScoped};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One dated outlay against a project, optionally with a receipt photo.
///
/// The photo blob itself is never loaded with the row; `has_photo_blob` tells
/// whether one is stored. Hosted photos carry `photo_url` and `photo_ref`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Id,
    pub project_id: Id,

    /// Day the money was spent
    pub spent_on: NaiveDate,

    pub concept: String,

    /// Nullable for legacy rows; counts as zero in totals
    pub amount: Option<Decimal>,

    pub category: Option<String>,

    pub photo_name: Option<String>,
    pub photo_mime: Option<String>,
    pub photo_url: Option<String>,
    pub photo_ref: Option<String>,
    pub has_photo_blob: bool,

    pub created_at: DateTime<Utc>,
}

/// Where an expense's receipt photo can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoLocation {
    None,
    /// Stored in the expenses table
    Blob,
    /// Delegated to the hosted media store
    Hosted { url: String },
}

impl Expense {
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or_default()
    }

    pub fn photo_location(&self) -> PhotoLocation {
        if let Some(url) = &self.photo_url {
            return PhotoLocation::Hosted { url: url.clone() };
        }
        if self.has_photo_blob && self.photo_mime.is_some() {
            return PhotoLocation::Blob;
        }
        PhotoLocation::None
    }

    pub fn has_photo(&self) -> bool {
        self.photo_location() != PhotoLocation::None
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Id {
        self.id
    }
}

impl ProjectScoped for Expense {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for Expense {
    const TYPE_NAME: &'static str = "Expense";
}

/// Photo payload of a stored blob, as served by the photo view
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExpensePhoto {
    pub photo_name: Option<String>,
    pub photo_mime: String,
    pub photo_bytes: Vec<u8>,
}

/// Photo attached to a new expense
#[derive(Debug, Clone, PartialEq)]
pub enum NewPhoto {
    /// Keep the bytes in the database
    Blob {
        filename: String,
        mime: String,
        data: Vec<u8>,
    },
    /// Already uploaded to the hosted media store
    Hosted {
        filename: String,
        mime: String,
        url: String,
        reference: String,
    },
}

impl NewPhoto {
    pub fn filename(&self) -> &str {
        match self {
            NewPhoto::Blob { filename, .. } | NewPhoto::Hosted { filename, .. } => filename,
        }
    }

    pub fn mime(&self) -> &str {
        match self {
            NewPhoto::Blob { mime, .. } | NewPhoto::Hosted { mime, .. } => mime,
        }
    }

    pub fn blob(&self) -> Option<&[u8]> {
        match self {
            NewPhoto::Blob { data, .. } => Some(data),
            NewPhoto::Hosted { .. } => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            NewPhoto::Hosted { url, .. } => Some(url),
            NewPhoto::Blob { .. } => None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            NewPhoto::Hosted { reference, .. } => Some(reference),
            NewPhoto::Blob { .. } => None,
        }
    }
}

/// Insert DTO for an expense
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewExpense {
    pub project_id: Id,
    pub spent_on: NaiveDate,

    #[validate(length(min = 1, max = 250))]
    pub concept: String,

    pub amount: Decimal,

    #[validate(length(max = 80))]
    pub category: Option<String>,

    pub photo: Option<NewPhoto>,
}

impl NewExpense {
    pub fn with_photo(mut self, photo: NewPhoto) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Drop the photo, keeping the rest of the expense
    pub fn without_photo(mut self) -> Self {
        self.photo = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expense() -> Expense {
        Expense {
            id: 1,
            project_id: 3,
            spent_on: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            concept: "Cemento".into(),
            amount: Some(dec!(200)),
            category: None,
            photo_name: None,
            photo_mime: None,
            photo_url: None,
            photo_ref: None,
            has_photo_blob: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_photo_location() {
        let mut e = expense();
        assert_eq!(e.photo_location(), PhotoLocation::None);
        assert!(!e.has_photo());

        e.has_photo_blob = true;
        e.photo_mime = Some("image/jpeg".into());
        assert_eq!(e.photo_location(), PhotoLocation::Blob);

        e.photo_url = Some("https://media.example/r.jpg".into());
        assert_eq!(
            e.photo_location(),
            PhotoLocation::Hosted {
                url: "https://media.example/r.jpg".into()
            }
        );
    }

    #[test]
    fn test_missing_amount_is_zero() {
        let mut e = expense();
        e.amount = None;
        assert_eq!(e.amount_or_zero(), Decimal::ZERO);
        assert!(e.belongs_to(3));
    }

    #[test]
    fn test_new_photo_accessors() {
        let photo = NewPhoto::Hosted {
            filename: "ticket.png".into(),
            mime: "image/png".into(),
            url: "https://media.example/t.png".into(),
            reference: "obras/t".into(),
        };
        assert_eq!(photo.filename(), "ticket.png");
        assert_eq!(photo.reference(), Some("obras/t"));
        assert!(photo.blob().is_none());
    }
}
