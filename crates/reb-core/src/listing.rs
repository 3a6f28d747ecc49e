//! Listing texts: titles, hashtags, the channel post, the personalized template and the
//! cards shown inside the bot. All output is Telegram HTML; user input is escaped here.

use crate::{
    domain::{ApprovalStatus, DealStatus, Language, Listing, NewListing, PropertyType},
    draft::Draft,
    formatting::{escape_html, format_area, group_thousands, truncate_chars},
    i18n::{self, TextKey},
};

const TITLE_MAX_CHARS: usize = 50;
const CARD_DESCRIPTION_MAX_CHARS: usize = 100;
const LIST_DESCRIPTION_MAX_CHARS: usize = 300;

/// First line of the description, cut to 50 characters; `...` marks a longer description.
pub fn derive_title(description: &str) -> String {
    let first_line = description.lines().next().unwrap_or_default();
    let mut title: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
    if description.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// `#apartment #rent #maklersiz`
pub fn hashtags(property_type: PropertyType, status: DealStatus, is_makler: bool) -> String {
    let makler = if is_makler { "#makler" } else { "#maklersiz" };
    format!("#{} #{} {makler}", property_type.as_str(), status.as_str())
}

/// Fields the channel post is built from; shared by drafts and stored listings.
#[derive(Clone, Copy, Debug)]
pub struct ChannelPost<'a> {
    pub description: &'a str,
    pub contact_info: &'a str,
    pub full_address: &'a str,
    pub property_type: PropertyType,
    pub status: DealStatus,
    pub is_makler: bool,
}

impl<'a> From<&'a NewListing> for ChannelPost<'a> {
    fn from(l: &'a NewListing) -> Self {
        Self {
            description: &l.description,
            contact_info: &l.contact_info,
            full_address: &l.full_address,
            property_type: l.property_type,
            status: l.status,
            is_makler: l.is_makler,
        }
    }
}

impl<'a> From<&'a Listing> for ChannelPost<'a> {
    fn from(l: &'a Listing) -> Self {
        Self {
            description: &l.description,
            contact_info: &l.contact_info,
            full_address: &l.full_address,
            property_type: l.property_type,
            status: l.status,
            is_makler: l.is_makler,
        }
    }
}

/// The exact text published to the channel. The channel is Uzbek-language.
pub fn channel_text(post: ChannelPost<'_>) -> String {
    format!(
        "{}\n\n{} {}\n\n{} {}\n\n{}",
        escape_html(post.description),
        i18n::text(Language::Uz, TextKey::ChannelContact),
        escape_html(post.contact_info),
        i18n::text(Language::Uz, TextKey::ChannelAddress),
        escape_html(post.full_address),
        hashtags(post.property_type, post.status, post.is_makler),
    )
}

fn template_key(property_type: PropertyType, status: DealStatus) -> TextKey {
    match (property_type, status) {
        (PropertyType::Land, DealStatus::Sale) => TextKey::TemplateLandSale,
        (PropertyType::Land, DealStatus::Rent) => TextKey::TemplateLandRent,
        (PropertyType::Commercial, DealStatus::Sale) => TextKey::TemplateCommercialSale,
        (PropertyType::Commercial, DealStatus::Rent) => TextKey::TemplateCommercialRent,
        (_, DealStatus::Sale) => TextKey::TemplateResidentialSale,
        (_, DealStatus::Rent) => TextKey::TemplateResidentialRent,
    }
}

/// Sample listing text filled with what the user typed so far (shown after the area step).
///
/// `None` until type, status, location, price and area are all known.
pub fn personalized_template(lang: Language, draft: &Draft) -> Option<String> {
    let property_type = draft.property_type?;
    let status = draft.status?;
    let location = draft.full_address(lang)?;
    let price = draft.price_text.as_deref()?;
    let area = draft.area_text.as_deref()?;

    let body = i18n::format(
        lang,
        template_key(property_type, status),
        &[
            ("location", escape_html(&location).as_str()),
            ("price", escape_html(price).as_str()),
            ("area", escape_html(area).as_str()),
        ],
    );
    Some(format!(
        "{}\n\n{body}\n\n{}",
        i18n::text(lang, TextKey::TemplateHeader),
        i18n::text(lang, TextKey::TemplateNote)
    ))
}

/// Preview title followed by the channel text the draft would produce.
pub fn preview_text(lang: Language, draft: &Draft) -> Option<String> {
    let listing = draft.to_new_listing(lang)?;
    Some(format!(
        "{}\n\n{}",
        i18n::text(lang, TextKey::PreviewTitle),
        channel_text(ChannelPost::from(&listing))
    ))
}

pub fn status_badge(lang: Language, listing: &Listing) -> &'static str {
    let key = match listing.approval_status {
        ApprovalStatus::Approved if !listing.is_active => TextKey::BadgeInactive,
        ApprovalStatus::Approved => TextKey::BadgeApproved,
        ApprovalStatus::Pending => TextKey::BadgePending,
        ApprovalStatus::Rejected => TextKey::BadgeRejected,
    };
    i18n::text(lang, key)
}

/// Owner view in "my postings".
pub fn my_posting_card(lang: Language, listing: &Listing) -> String {
    let id = listing.id.to_string();
    let lines = [
        i18n::format(lang, TextKey::LineListingId, &[("id", id.as_str())]),
        i18n::format(
            lang,
            TextKey::LineStatus,
            &[("status", status_badge(lang, listing))],
        ),
        String::new(),
        format!("🏠 <b>{}</b>", escape_html(&listing.title)),
        i18n::format(
            lang,
            TextKey::LineAddress,
            &[("address", escape_html(&listing.full_address).as_str())],
        ),
        i18n::format(
            lang,
            TextKey::LinePrice,
            &[("price", group_thousands(listing.price).as_str())],
        ),
        i18n::format(lang, TextKey::LineArea, &[("area", format_area(listing.area).as_str())]),
        String::new(),
        i18n::format(
            lang,
            TextKey::LineDescription,
            &[(
                "description",
                escape_html(&truncate_chars(
                    &listing.description,
                    CARD_DESCRIPTION_MAX_CHARS,
                ))
                .as_str(),
            )],
        ),
        i18n::format(
            lang,
            TextKey::LineFavorites,
            &[("count", listing.favorites_count.to_string().as_str())],
        ),
    ];
    lines.join("\n")
}

/// Public card used by search results and favorites. Contact info stays behind its button.
pub fn listing_card(lang: Language, listing: &Listing) -> String {
    let id = listing.id.to_string();
    [
        i18n::format(lang, TextKey::LineListingId, &[("id", id.as_str())]),
        String::new(),
        escape_html(&truncate_chars(
            &listing.description,
            LIST_DESCRIPTION_MAX_CHARS,
        )),
        String::new(),
        i18n::format(
            lang,
            TextKey::LineAddress,
            &[("address", escape_html(&listing.full_address).as_str())],
        ),
        i18n::format(
            lang,
            TextKey::LinePrice,
            &[("price", group_thousands(listing.price).as_str())],
        ),
        i18n::format(lang, TextKey::LineArea, &[("area", format_area(listing.area).as_str())]),
        hashtags(listing.property_type, listing.status, listing.is_makler),
    ]
    .join("\n")
}

/// Submission as shown to moderators in the admin channel.
pub fn admin_review_text(listing: &Listing) -> String {
    let name = listing
        .author_first_name
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "-".to_string());
    let username = listing
        .author_username
        .as_deref()
        .map(|u| format!("@{}", escape_html(u)))
        .unwrap_or_else(|| "-".to_string());
    let id = listing.id.to_string();

    format!(
        "{}\n\n{}\n\n{}",
        i18n::text(Language::Uz, TextKey::AdminNewListing),
        channel_text(ChannelPost::from(listing)),
        i18n::format(
            Language::Uz,
            TextKey::AdminSubmitter,
            &[("name", name.as_str()), ("username", username.as_str()), ("id", id.as_str())],
        )
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{ListingId, UserId};
    use chrono::Utc;

    pub(crate) fn sample_listing(id: i64, author: i64) -> Listing {
        let now = Utc::now();
        Listing {
            id: ListingId(id),
            author_id: UserId(author),
            author_username: Some("ali".into()),
            author_first_name: Some("Ali".into()),
            title: "2 xonali kvartira".into(),
            description: "2 xonali kvartira\nYevro remont".into(),
            property_type: PropertyType::Apartment,
            status: DealStatus::Sale,
            is_makler: true,
            region: "tashkent_city".into(),
            district: "chilanzar".into(),
            full_address: "Chilonzor, Toshkent shahri".into(),
            price: 65_000_000,
            area: 54.5,
            contact_info: "+998901234567".into(),
            photo_file_ids: vec![],
            approval_status: ApprovalStatus::Pending,
            is_approved: false,
            is_active: true,
            favorites_count: 3,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    fn rent_apartment_draft() -> Draft {
        Draft {
            property_type: Some(PropertyType::Apartment),
            status: Some(DealStatus::Rent),
            is_makler: Some(false),
            region: Some("tashkent_city".into()),
            district: Some("chilanzar".into()),
            price: Some(50000),
            price_text: Some("50 000 so'm".into()),
            area: Some(65.5),
            area_text: Some("65.5".into()),
            description: Some("Ijaraga kvartira".into()),
            contact_info: Some("+998901234567".into()),
            photo_file_ids: vec![],
        }
    }

    #[test]
    fn title_is_first_line_capped() {
        assert_eq!(derive_title("Qisqa\nikkinchi qator"), "Qisqa");
        let long = "a".repeat(60);
        assert_eq!(derive_title(&long), format!("{}...", "a".repeat(50)));
        let second_line_long = format!("Sarlavha\n{}", "b".repeat(60));
        assert_eq!(derive_title(&second_line_long), "Sarlavha...");
    }

    #[test]
    fn channel_text_layout() {
        let listing = sample_listing(7, 1);
        let text = channel_text(ChannelPost::from(&listing));
        assert_eq!(
            text,
            "2 xonali kvartira\nYevro remont\n\n📞 Aloqa: +998901234567\n\n🗺 Manzil: Chilonzor, Toshkent shahri\n\n#apartment #sale #makler"
        );
    }

    #[test]
    fn channel_text_escapes_user_input() {
        let mut listing = sample_listing(7, 1);
        listing.description = "<b>arzon</b> & yaxshi".into();
        let text = channel_text(ChannelPost::from(&listing));
        assert!(text.starts_with("&lt;b&gt;arzon&lt;/b&gt; &amp; yaxshi"));
    }

    #[test]
    fn rent_apartment_template_and_preview() {
        let draft = rent_apartment_draft();
        let template = personalized_template(Language::Uz, &draft).unwrap();
        assert!(template.contains("KVARTIRA IJARAGA BERILADI"));
        assert!(template.contains("💰 Narxi: 50 000 so'm"));
        assert!(template.contains("📐 Maydon: 65.5 m²"));
        assert!(template.contains("🕒 Muddat"));
        assert!(!template.contains("Qavat"));

        let preview = preview_text(Language::Uz, &draft).unwrap();
        assert!(preview.contains("#apartment #rent #maklersiz"));
        assert!(preview.contains("🗺 Manzil: Chilonzor, Toshkent shahri"));
    }

    #[test]
    fn template_keeps_braces_typed_by_the_user() {
        let mut draft = rent_apartment_draft();
        draft.price_text = Some("{area} so'm".into());
        let template = personalized_template(Language::En, &draft).unwrap();
        assert!(template.contains("{area} so'm"), "{template}");
        assert!(template.contains("65.5"));
    }

    #[test]
    fn land_template_has_no_rooms() {
        let mut draft = rent_apartment_draft();
        draft.property_type = Some(PropertyType::Land);
        draft.status = Some(DealStatus::Sale);
        let template = personalized_template(Language::Ru, &draft).unwrap();
        assert!(template.contains("Продается пустой участок"));
        assert!(template.contains("соток"));
        assert!(!template.contains("Комнаты"));
    }

    #[test]
    fn template_needs_location_and_numbers() {
        let mut draft = rent_apartment_draft();
        draft.area_text = None;
        assert!(personalized_template(Language::En, &draft).is_none());
    }

    #[test]
    fn posting_card_shows_badge_and_grouped_price() {
        let mut listing = sample_listing(12, 1);
        let card = my_posting_card(Language::Uz, &listing);
        assert!(card.contains("🆔 <b>E'lon #12</b>"));
        assert!(card.contains("🟡 Kutilmoqda"));
        assert!(card.contains("65,000,000 so'm"));
        assert!(card.contains("54.5 m²"));
        assert!(card.contains("3 ta"));

        listing.approval_status = ApprovalStatus::Approved;
        listing.is_approved = true;
        listing.is_active = false;
        assert_eq!(status_badge(Language::En, &listing), "⚪️ Inactive");
    }

    #[test]
    fn admin_text_names_the_author() {
        let listing = sample_listing(5, 1);
        let text = admin_review_text(&listing);
        assert!(text.starts_with("🆕 <b>YANGI E'LON TEKSHIRISH UCHUN</b>"));
        assert!(text.contains("Ali (@ali)"));
        assert!(text.contains("#5"));
    }
}
