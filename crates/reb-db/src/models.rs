//! Row types read from PostgreSQL and their conversion into domain types.

use chrono::{DateTime, Utc};
use reb_core::{
    domain::{ApprovalStatus, DealStatus, Listing, ListingId, PropertyType, UserId},
    Error,
};
use sqlx::{types::Json, FromRow};

/// A `listings` row joined with its author (`users`).
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: i64,
    pub author_telegram_id: i64,
    pub author_username: Option<String>,
    pub author_first_name: Option<String>,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub status: String,
    pub is_makler: bool,
    pub region: String,
    pub district: String,
    pub full_address: String,
    pub price: i64,
    pub area: f64,
    pub contact_info: String,
    pub photo_file_ids: Json<Vec<String>>,
    pub approval_status: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub favorites_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = Error;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let property_type = PropertyType::parse(&row.property_type).ok_or_else(|| {
            Error::Storage(format!(
                "listing {}: unknown property_type {:?}",
                row.id, row.property_type
            ))
        })?;
        let status = DealStatus::parse(&row.status).ok_or_else(|| {
            Error::Storage(format!("listing {}: unknown status {:?}", row.id, row.status))
        })?;
        let approval_status = ApprovalStatus::parse(&row.approval_status).ok_or_else(|| {
            Error::Storage(format!(
                "listing {}: unknown approval_status {:?}",
                row.id, row.approval_status
            ))
        })?;

        Ok(Listing {
            id: ListingId(row.id),
            author_id: UserId(row.author_telegram_id),
            author_username: row.author_username.filter(|s| !s.is_empty()),
            author_first_name: row.author_first_name.filter(|s| !s.is_empty()),
            title: row.title,
            description: row.description,
            property_type,
            status,
            is_makler: row.is_makler,
            region: row.region,
            district: row.district,
            full_address: row.full_address,
            price: row.price,
            area: row.area,
            contact_info: row.contact_info,
            photo_file_ids: row.photo_file_ids.0,
            approval_status,
            is_approved: row.is_approved,
            is_active: row.is_active,
            favorites_count: row.favorites_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
        })
    }
}

pub fn into_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, Error> {
    rows.into_iter().map(Listing::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ListingRow {
        let now = Utc::now();
        ListingRow {
            id: 3,
            author_telegram_id: 555,
            author_username: Some(String::new()),
            author_first_name: Some("Dilnoza".into()),
            title: "Uy".into(),
            description: "Uy sotiladi".into(),
            property_type: "house".into(),
            status: "sale".into(),
            is_makler: false,
            region: "samarkand".into(),
            district: "urgut".into(),
            full_address: "Urgut, Samarqand viloyati".into(),
            price: 120_000,
            area: 300.0,
            contact_info: "+998 90 000 00 00".into(),
            photo_file_ids: Json(vec!["a".into(), "b".into()]),
            approval_status: "approved".into(),
            is_approved: true,
            is_active: true,
            favorites_count: 2,
            created_at: now,
            updated_at: now,
            published_at: Some(now),
        }
    }

    #[test]
    fn converts_a_joined_row() {
        let listing = Listing::try_from(row()).unwrap();
        assert_eq!(listing.author_id, UserId(555));
        assert_eq!(listing.property_type, PropertyType::House);
        assert_eq!(listing.approval_status, ApprovalStatus::Approved);
        assert_eq!(listing.photo_file_ids, vec!["a", "b"]);
        // Empty usernames are stored by older clients; treat them as absent.
        assert_eq!(listing.author_username, None);
    }

    #[test]
    fn unknown_enum_values_are_storage_errors() {
        let mut bad = row();
        bad.property_type = "castle".into();
        assert!(matches!(Listing::try_from(bad), Err(Error::Storage(_))));
    }
}
