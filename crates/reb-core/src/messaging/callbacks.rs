//! Callback-data codec for inline buttons.
//!
//! Telegram caps callback data at 64 bytes, so actions are encoded as short `:`-separated
//! tokens. Location keys are ASCII snake_case and never contain `:`.

use std::fmt;

use crate::{
    domain::{DealStatus, Language, ListingId, PropertyType},
    draft::Field,
    ports::LocationFilter,
};

pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Placeholder for a filter left open ("all").
const ANY: &str = "*";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Home,
    Post,
    MyPostings,
    Search,
    Favorites,
    Info,
    Language,
    Admin,
}

/// Buttons pressed while filling in the listing form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormButton {
    PropertyType(PropertyType),
    Status(DealStatus),
    Makler(bool),
    Region(String),
    District(String),
    DescriptionDone,
    DescriptionAddMore,
    PhotosDone,
    PhotosSkip,
    Confirm,
    EditMenu,
    Edit(Field),
    BackToPreview,
    Back,
    Cancel,
}

/// Paginated views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    MyPostings,
    Favorites,
    SearchResults,
    Pending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    Menu(MenuItem),
    SetLanguage(Language),
    Form(FormButton),
    SearchKeyword,
    SearchLocation,
    SearchRegion(String),
    /// `district: None` searches the whole region. Asks for the property type next.
    SearchDistrict {
        region: String,
        district: Option<String>,
    },
    /// Location and property type chosen (`None` = all types); asks sale or rent next.
    SearchPropertyType(LocationFilter),
    /// Every filter chosen; runs the location search.
    SearchRun(LocationFilter),
    Page { view: View, page: u32 },
    AddFavorite(ListingId),
    Contact(ListingId),
    Activate(ListingId),
    Deactivate(ListingId),
    Delete(ListingId),
    ConfirmDelete(ListingId),
    KeepListing(ListingId),
    Approve(ListingId),
    Reject(ListingId),
    /// Page indicator; answered without doing anything.
    Noop,
}

impl MenuItem {
    fn code(self) -> &'static str {
        match self {
            MenuItem::Home => "home",
            MenuItem::Post => "post",
            MenuItem::MyPostings => "mine",
            MenuItem::Search => "search",
            MenuItem::Favorites => "favs",
            MenuItem::Info => "info",
            MenuItem::Language => "lang",
            MenuItem::Admin => "admin",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "home" => MenuItem::Home,
            "post" => MenuItem::Post,
            "mine" => MenuItem::MyPostings,
            "search" => MenuItem::Search,
            "favs" => MenuItem::Favorites,
            "info" => MenuItem::Info,
            "lang" => MenuItem::Language,
            "admin" => MenuItem::Admin,
            _ => return None,
        })
    }
}

impl View {
    fn code(self) -> &'static str {
        match self {
            View::MyPostings => "mine",
            View::Favorites => "favs",
            View::SearchResults => "found",
            View::Pending => "pending",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "mine" => View::MyPostings,
            "favs" => View::Favorites,
            "found" => View::SearchResults,
            "pending" => View::Pending,
            _ => return None,
        })
    }
}

fn field_code(field: Field) -> &'static str {
    match field {
        Field::PropertyType => "type",
        Field::Status => "status",
        Field::Makler => "makler",
        Field::Location => "loc",
        Field::Price => "price",
        Field::Area => "area",
        Field::Description => "desc",
        Field::Contact => "contact",
        Field::Photos => "photos",
    }
}

fn field_from_code(code: &str) -> Option<Field> {
    Field::ALL.into_iter().find(|f| field_code(*f) == code)
}

impl FormButton {
    fn encode(&self) -> String {
        match self {
            FormButton::PropertyType(t) => format!("type:{}", t.as_str()),
            FormButton::Status(s) => format!("status:{}", s.as_str()),
            FormButton::Makler(true) => "makler:yes".to_string(),
            FormButton::Makler(false) => "makler:no".to_string(),
            FormButton::Region(key) => format!("region:{key}"),
            FormButton::District(key) => format!("district:{key}"),
            FormButton::DescriptionDone => "desc:done".to_string(),
            FormButton::DescriptionAddMore => "desc:more".to_string(),
            FormButton::PhotosDone => "photos:done".to_string(),
            FormButton::PhotosSkip => "photos:skip".to_string(),
            FormButton::Confirm => "confirm".to_string(),
            FormButton::EditMenu => "edit".to_string(),
            FormButton::Edit(field) => format!("edit:{}", field_code(*field)),
            FormButton::BackToPreview => "preview".to_string(),
            FormButton::Back => "back".to_string(),
            FormButton::Cancel => "cancel".to_string(),
        }
    }

    fn parse(parts: &[&str]) -> Option<Self> {
        Some(match parts {
            ["type", t] => FormButton::PropertyType(PropertyType::parse(t)?),
            ["status", s] => FormButton::Status(DealStatus::parse(s)?),
            ["makler", "yes"] => FormButton::Makler(true),
            ["makler", "no"] => FormButton::Makler(false),
            ["region", key] if !key.is_empty() => FormButton::Region(key.to_string()),
            ["district", key] if !key.is_empty() => FormButton::District(key.to_string()),
            ["desc", "done"] => FormButton::DescriptionDone,
            ["desc", "more"] => FormButton::DescriptionAddMore,
            ["photos", "done"] => FormButton::PhotosDone,
            ["photos", "skip"] => FormButton::PhotosSkip,
            ["confirm"] => FormButton::Confirm,
            ["edit"] => FormButton::EditMenu,
            ["edit", field] => FormButton::Edit(field_from_code(field)?),
            ["preview"] => FormButton::BackToPreview,
            ["back"] => FormButton::Back,
            ["cancel"] => FormButton::Cancel,
            _ => return None,
        })
    }
}

fn slot(value: Option<&str>) -> &str {
    value.unwrap_or(ANY)
}

fn unslot(raw: &str) -> Option<Option<String>> {
    match raw {
        "" => None,
        ANY => Some(None),
        value => Some(Some(value.to_string())),
    }
}

fn location_slots(filter: &LocationFilter) -> String {
    format!(
        "{}:{}:{}",
        slot(filter.region.as_deref()),
        slot(filter.district.as_deref()),
        slot(filter.property_type.map(PropertyType::as_str)),
    )
}

fn parse_filter(region: &str, district: &str, kind: &str, status: &str) -> Option<LocationFilter> {
    Some(LocationFilter {
        region: unslot(region)?,
        district: unslot(district)?,
        property_type: match kind {
            ANY => None,
            kind => Some(PropertyType::parse(kind)?),
        },
        status: match status {
            ANY => None,
            status => Some(DealStatus::parse(status)?),
        },
    })
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Menu(item) => format!("m:{}", item.code()),
            CallbackAction::SetLanguage(lang) => format!("lang:{}", lang.code()),
            CallbackAction::Form(button) => format!("f:{}", button.encode()),
            CallbackAction::SearchKeyword => "s:kw".to_string(),
            CallbackAction::SearchLocation => "s:loc".to_string(),
            CallbackAction::SearchRegion(region) => format!("s:r:{region}"),
            CallbackAction::SearchDistrict {
                region,
                district: Some(district),
            } => format!("s:d:{region}:{district}"),
            CallbackAction::SearchDistrict {
                region,
                district: None,
            } => format!("s:d:{region}"),
            CallbackAction::SearchPropertyType(filter) => format!("s:t:{}", location_slots(filter)),
            CallbackAction::SearchRun(filter) => format!(
                "s:x:{}:{}",
                location_slots(filter),
                slot(filter.status.map(DealStatus::as_str))
            ),
            CallbackAction::Page { view, page } => format!("p:{}:{page}", view.code()),
            CallbackAction::AddFavorite(id) => format!("fav:{id}"),
            CallbackAction::Contact(id) => format!("contact:{id}"),
            CallbackAction::Activate(id) => format!("on:{id}"),
            CallbackAction::Deactivate(id) => format!("off:{id}"),
            CallbackAction::Delete(id) => format!("del:{id}"),
            CallbackAction::ConfirmDelete(id) => format!("del:yes:{id}"),
            CallbackAction::KeepListing(id) => format!("del:no:{id}"),
            CallbackAction::Approve(id) => format!("approve:{id}"),
            CallbackAction::Reject(id) => format!("reject:{id}"),
            CallbackAction::Noop => "noop".to_string(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        let id = |raw: &str| raw.parse::<i64>().ok().map(ListingId);

        Some(match parts.as_slice() {
            ["m", item] => CallbackAction::Menu(MenuItem::from_code(item)?),
            ["lang", code] => CallbackAction::SetLanguage(Language::from_code(code)?),
            ["f", rest @ ..] => CallbackAction::Form(FormButton::parse(rest)?),
            ["s", "kw"] => CallbackAction::SearchKeyword,
            ["s", "loc"] => CallbackAction::SearchLocation,
            ["s", "r", region] if !region.is_empty() => {
                CallbackAction::SearchRegion(region.to_string())
            }
            ["s", "d", region] if !region.is_empty() => CallbackAction::SearchDistrict {
                region: region.to_string(),
                district: None,
            },
            ["s", "d", region, district] if !region.is_empty() && !district.is_empty() => {
                CallbackAction::SearchDistrict {
                    region: region.to_string(),
                    district: Some(district.to_string()),
                }
            }
            ["s", "t", region, district, kind] => {
                CallbackAction::SearchPropertyType(parse_filter(region, district, kind, ANY)?)
            }
            ["s", "x", region, district, kind, status] => {
                CallbackAction::SearchRun(parse_filter(region, district, kind, status)?)
            }
            ["p", view, page] => CallbackAction::Page {
                view: View::from_code(view)?,
                page: page.parse().ok().filter(|p| *p > 0)?,
            },
            ["fav", raw] => CallbackAction::AddFavorite(id(raw)?),
            ["contact", raw] => CallbackAction::Contact(id(raw)?),
            ["on", raw] => CallbackAction::Activate(id(raw)?),
            ["off", raw] => CallbackAction::Deactivate(id(raw)?),
            ["del", "yes", raw] => CallbackAction::ConfirmDelete(id(raw)?),
            ["del", "no", raw] => CallbackAction::KeepListing(id(raw)?),
            ["del", raw] => CallbackAction::Delete(id(raw)?),
            ["approve", raw] => CallbackAction::Approve(id(raw)?),
            ["reject", raw] => CallbackAction::Reject(id(raw)?),
            ["noop"] => CallbackAction::Noop,
            _ => return None,
        })
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations;

    #[test]
    fn parses_what_it_encodes() {
        let actions = vec![
            CallbackAction::Menu(MenuItem::MyPostings),
            CallbackAction::SetLanguage(Language::Ru),
            CallbackAction::Form(FormButton::PropertyType(PropertyType::Land)),
            CallbackAction::Form(FormButton::Makler(false)),
            CallbackAction::Form(FormButton::Region("tashkent_city".into())),
            CallbackAction::Form(FormButton::Edit(Field::Location)),
            CallbackAction::Form(FormButton::EditMenu),
            CallbackAction::SearchDistrict {
                region: "samarkand".into(),
                district: None,
            },
            CallbackAction::SearchDistrict {
                region: "samarkand".into(),
                district: Some("urgut".into()),
            },
            CallbackAction::SearchPropertyType(LocationFilter {
                property_type: Some(PropertyType::House),
                ..LocationFilter::region("samarkand")
            }),
            CallbackAction::SearchPropertyType(LocationFilter::district("samarkand", "urgut")),
            CallbackAction::SearchRun(LocationFilter {
                property_type: Some(PropertyType::Commercial),
                status: Some(DealStatus::Rent),
                ..LocationFilter::district("tashkent_city", "mirzo_ulugbek")
            }),
            CallbackAction::SearchRun(LocationFilter {
                status: Some(DealStatus::Sale),
                ..LocationFilter::region("andijan")
            }),
            CallbackAction::Page {
                view: View::SearchResults,
                page: 3,
            },
            CallbackAction::Delete(ListingId(12)),
            CallbackAction::ConfirmDelete(ListingId(12)),
            CallbackAction::KeepListing(ListingId(12)),
            CallbackAction::Reject(ListingId(99)),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn rejects_garbage() {
        for data in [
            "",
            "m:nope",
            "fav:abc",
            "p:mine:0",
            "f:type:castle",
            "f:edit:rooms",
            "s:d:",
            "s:t:samarkand:*:castle",
            "s:x:samarkand:*:*:swap",
            "s:x::*:*:*",
            "approve",
        ] {
            assert_eq!(CallbackAction::parse(data), None, "{data}");
        }
    }

    #[test]
    fn every_location_fits_the_callback_limit() {
        for region in locations::regions() {
            for district in region.districts {
                let data = CallbackAction::SearchRun(LocationFilter {
                    property_type: Some(PropertyType::Commercial),
                    status: Some(DealStatus::Rent),
                    ..LocationFilter::district(region.key, district.key)
                })
                .encode();
                assert!(data.len() <= MAX_CALLBACK_DATA_LEN, "{data}");
            }
        }
        let data = CallbackAction::Page {
            view: View::Pending,
            page: u32::MAX,
        }
        .encode();
        assert!(data.len() <= MAX_CALLBACK_DATA_LEN);
    }
}
