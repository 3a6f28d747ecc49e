use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl From<UserId> for ChatId {
    /// Private chats share the user's id.
    fn from(u: UserId) -> Self {
        ChatId(u.0)
    }
}

/// Where a post goes: a private/group chat by id, or a public channel by `@username`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Chat(ChatId),
    Channel(String),
}

impl Destination {
    /// Parse a configured target: numeric ids (including `-100…` channel ids) become
    /// `Chat`, anything else is treated as a channel username.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(id) => Destination::Chat(ChatId(id)),
            Err(_) if raw.starts_with('@') => Destination::Channel(raw.to_string()),
            Err(_) => Destination::Channel(format!("@{raw}")),
        }
    }
}

impl From<ChatId> for Destination {
    fn from(c: ChatId) -> Self {
        Destination::Chat(c)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Chat(c) => write!(f, "{}", c.0),
            Destination::Channel(name) => f.write_str(name),
        }
    }
}

/// Database id of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub i64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Uz,
    Ru,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Uz, Language::Ru, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "uz" => Some(Language::Uz),
            "ru" => Some(Language::Ru),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Commercial,
    Land,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Commercial,
        PropertyType::Land,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Land and commercial objects have no floor/rooms lines in their template.
    pub fn is_residential(self) -> bool {
        matches!(self, PropertyType::Apartment | PropertyType::House)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Sale,
    Rent,
}

impl DealStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DealStatus::Sale => "sale",
            DealStatus::Rent => "rent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(DealStatus::Sale),
            "rent" => Some(DealStatus::Rent),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }

    /// The `is_approved` column mirrors this value.
    pub fn is_approved(self) -> bool {
        self == ApprovalStatus::Approved
    }
}

/// Identity fields captured on `/start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A listing ready to be inserted (always as pending).
#[derive(Clone, Debug, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub status: DealStatus,
    pub is_makler: bool,
    pub region: String,
    pub district: String,
    pub full_address: String,
    pub price: i64,
    pub area: f64,
    pub contact_info: String,
    pub photo_file_ids: Vec<String>,
}

/// A stored listing joined with its author.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub author_id: UserId,
    pub author_username: Option<String>,
    pub author_first_name: Option<String>,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub status: DealStatus,
    pub is_makler: bool,
    pub region: String,
    pub district: String,
    pub full_address: String,
    pub price: i64,
    pub area: f64,
    pub contact_info: String,
    pub photo_file_ids: Vec<String>,
    pub approval_status: ApprovalStatus,
    pub is_approved: bool,
    pub is_active: bool,
    pub favorites_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Visible to the public (search, favorites, channel).
    pub fn is_public(&self) -> bool {
        self.is_approved && self.is_active
    }
}

/// 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn total_pages(&self, total: i64) -> u32 {
        let size = i64::from(self.size);
        ((total.max(0) + size - 1) / size) as u32
    }
}

/// A page of results plus the total count across all pages.
#[derive(Clone, Debug)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: Page,
}

impl<T> Paged<T> {
    pub fn total_pages(&self) -> u32 {
        self.page.total_pages(self.total)
    }
}
