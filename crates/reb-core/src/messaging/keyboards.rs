//! Inline keyboards, localized.

use crate::{
    domain::{DealStatus, Language, Listing, ListingId, PropertyType},
    draft::{Draft, Field, Step},
    i18n::{self, TextKey},
    locations,
    messaging::{
        callbacks::{CallbackAction, FormButton, MenuItem, View},
        types::{InlineButton, InlineKeyboard},
    },
    ports::LocationFilter,
};

fn button(lang: Language, key: TextKey, action: CallbackAction) -> InlineButton {
    InlineButton::new(i18n::text(lang, key), action.encode())
}

fn form_button(lang: Language, key: TextKey, b: FormButton) -> InlineButton {
    button(lang, key, CallbackAction::Form(b))
}

fn menu_button(lang: Language, key: TextKey, item: MenuItem) -> InlineButton {
    button(lang, key, CallbackAction::Menu(item))
}

pub fn main_menu(lang: Language, is_moderator: bool) -> InlineKeyboard {
    let kb = InlineKeyboard::new()
        .button(menu_button(lang, TextKey::BtnPostListing, MenuItem::Post))
        .row(vec![
            menu_button(lang, TextKey::BtnMyPostings, MenuItem::MyPostings),
            menu_button(lang, TextKey::BtnFavorites, MenuItem::Favorites),
        ])
        .button(menu_button(lang, TextKey::BtnSearch, MenuItem::Search))
        .row(vec![
            menu_button(lang, TextKey::BtnInfo, MenuItem::Info),
            menu_button(lang, TextKey::BtnLanguage, MenuItem::Language),
        ]);
    if is_moderator {
        kb.button(menu_button(lang, TextKey::BtnAdminPanel, MenuItem::Admin))
    } else {
        kb
    }
}

pub fn home(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new().button(menu_button(lang, TextKey::BtnMainMenu, MenuItem::Home))
}

/// Language names are always shown in their own language.
pub fn language_picker() -> InlineKeyboard {
    InlineKeyboard::new().row(
        [
            ("🇺🇿 O'zbekcha", Language::Uz),
            ("🇷🇺 Русский", Language::Ru),
            ("🇺🇸 English", Language::En),
        ]
        .into_iter()
        .map(|(label, lang)| InlineButton::new(label, CallbackAction::SetLanguage(lang).encode()))
        .collect(),
    )
}

fn nav_row(lang: Language) -> Vec<InlineButton> {
    vec![
        form_button(lang, TextKey::BtnBack, FormButton::Back),
        form_button(lang, TextKey::BtnCancelPosting, FormButton::Cancel),
    ]
}

fn property_type_key(t: PropertyType) -> TextKey {
    match t {
        PropertyType::Apartment => TextKey::PropertyApartment,
        PropertyType::House => TextKey::PropertyHouse,
        PropertyType::Commercial => TextKey::PropertyCommercial,
        PropertyType::Land => TextKey::PropertyLand,
    }
}

fn edit_key(field: Field) -> TextKey {
    match field {
        Field::PropertyType => TextKey::EditPropertyType,
        Field::Status => TextKey::EditStatus,
        Field::Makler => TextKey::EditMakler,
        Field::Location => TextKey::EditLocation,
        Field::Price => TextKey::EditPrice,
        Field::Area => TextKey::EditArea,
        Field::Description => TextKey::EditDescription,
        Field::Contact => TextKey::EditContact,
        Field::Photos => TextKey::EditPhotos,
    }
}

fn region_buttons(lang: Language, action: impl Fn(&str) -> CallbackAction) -> Vec<InlineButton> {
    locations::regions()
        .iter()
        .map(|r| InlineButton::new(r.name(lang), action(r.key).encode()))
        .collect()
}

/// Buttons shown under the prompt of a form step. Text steps only get navigation.
pub fn form_step(lang: Language, step: Step, draft: &Draft) -> InlineKeyboard {
    let kb = InlineKeyboard::new();
    let kb = match step {
        Step::PropertyType => kb.grid(
            PropertyType::ALL
                .into_iter()
                .map(|t| form_button(lang, property_type_key(t), FormButton::PropertyType(t)))
                .collect(),
            2,
        ),
        Step::Status => kb.row(vec![
            form_button(lang, TextKey::StatusSale, FormButton::Status(DealStatus::Sale)),
            form_button(lang, TextKey::StatusRent, FormButton::Status(DealStatus::Rent)),
        ]),
        Step::MaklerType => kb.row(vec![
            form_button(lang, TextKey::MaklerYes, FormButton::Makler(true)),
            form_button(lang, TextKey::MaklerNo, FormButton::Makler(false)),
        ]),
        Step::Region => kb.grid(
            region_buttons(lang, |key| {
                CallbackAction::Form(FormButton::Region(key.to_string()))
            }),
            2,
        ),
        Step::District => {
            let districts = draft
                .region
                .as_deref()
                .and_then(locations::find_region)
                .map(|r| r.districts)
                .unwrap_or_default();
            kb.grid(
                districts
                    .iter()
                    .map(|d| {
                        InlineButton::new(
                            d.name(lang),
                            CallbackAction::Form(FormButton::District(d.key.to_string())).encode(),
                        )
                    })
                    .collect(),
                2,
            )
        }
        Step::DescriptionReview => kb.row(vec![
            form_button(lang, TextKey::BtnDescriptionDone, FormButton::DescriptionDone),
            form_button(lang, TextKey::BtnDescriptionAddMore, FormButton::DescriptionAddMore),
        ]),
        Step::Photos => kb.row(vec![
            form_button(lang, TextKey::BtnPhotosDone, FormButton::PhotosDone),
            form_button(lang, TextKey::BtnPhotosSkip, FormButton::PhotosSkip),
        ]),
        Step::Preview => {
            return kb
                .button(form_button(lang, TextKey::BtnConfirmPost, FormButton::Confirm))
                .row(vec![
                    form_button(lang, TextKey::BtnEditListing, FormButton::EditMenu),
                    form_button(lang, TextKey::BtnCancelPosting, FormButton::Cancel),
                ]);
        }
        Step::EditMenu => {
            return kb
                .grid(
                    Field::ALL
                        .into_iter()
                        .map(|f| form_button(lang, edit_key(f), FormButton::Edit(f)))
                        .collect(),
                    2,
                )
                .button(form_button(
                    lang,
                    TextKey::BtnBackToPreview,
                    FormButton::BackToPreview,
                ));
        }
        Step::Price | Step::Area | Step::Description | Step::ContactInfo => kb,
    };
    kb.row(nav_row(lang))
}

pub fn search_choice(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new()
        .button(button(lang, TextKey::BtnSearchKeyword, CallbackAction::SearchKeyword))
        .button(button(lang, TextKey::BtnSearchLocation, CallbackAction::SearchLocation))
        .button(menu_button(lang, TextKey::BtnMainMenu, MenuItem::Home))
}

pub fn search_regions(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new()
        .grid(
            region_buttons(lang, |key| CallbackAction::SearchRegion(key.to_string())),
            2,
        )
        .button(menu_button(lang, TextKey::BtnBack, MenuItem::Search))
}

pub fn search_districts(lang: Language, region: &locations::Region) -> InlineKeyboard {
    let whole = InlineButton::new(
        i18n::text(lang, TextKey::BtnWholeRegion),
        CallbackAction::SearchDistrict {
            region: region.key.to_string(),
            district: None,
        }
        .encode(),
    );
    let districts = region
        .districts
        .iter()
        .map(|d| {
            InlineButton::new(
                d.name(lang),
                CallbackAction::SearchDistrict {
                    region: region.key.to_string(),
                    district: Some(d.key.to_string()),
                }
                .encode(),
            )
        })
        .collect();
    InlineKeyboard::new()
        .button(whole)
        .grid(districts, 2)
        .button(button(lang, TextKey::BtnBack, CallbackAction::SearchLocation))
}

/// Property type step of a location search, "all types" first.
pub fn search_property_types(lang: Language, filter: &LocationFilter) -> InlineKeyboard {
    let pick = |property_type: Option<PropertyType>| {
        CallbackAction::SearchPropertyType(LocationFilter {
            property_type,
            status: None,
            ..filter.clone()
        })
    };
    let types = PropertyType::ALL
        .into_iter()
        .map(|t| button(lang, property_type_key(t), pick(Some(t))))
        .collect();
    let back = match &filter.region {
        Some(region) => CallbackAction::SearchRegion(region.clone()),
        None => CallbackAction::SearchLocation,
    };
    InlineKeyboard::new()
        .button(button(lang, TextKey::BtnAllPropertyTypes, pick(None)))
        .grid(types, 2)
        .button(button(lang, TextKey::BtnBack, back))
}

/// Last step of a location search: sale, rent or both.
pub fn search_statuses(lang: Language, filter: &LocationFilter) -> InlineKeyboard {
    let run = |status: Option<DealStatus>| {
        CallbackAction::SearchRun(LocationFilter {
            status,
            ..filter.clone()
        })
    };
    let back = match &filter.region {
        Some(region) => CallbackAction::SearchDistrict {
            region: region.clone(),
            district: filter.district.clone(),
        },
        None => CallbackAction::SearchLocation,
    };
    InlineKeyboard::new()
        .row(vec![
            button(lang, TextKey::StatusSale, run(Some(DealStatus::Sale))),
            button(lang, TextKey::StatusRent, run(Some(DealStatus::Rent))),
        ])
        .button(button(lang, TextKey::BtnAllStatuses, run(None)))
        .button(button(lang, TextKey::BtnBack, back))
}

/// "Save" and "contact" under a public listing card.
pub fn listing_actions(lang: Language, id: ListingId) -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        button(lang, TextKey::BtnAddFavorite, CallbackAction::AddFavorite(id)),
        button(lang, TextKey::BtnContact, CallbackAction::Contact(id)),
    ])
}

/// Contact only: the listing is already in the user's favorites.
pub fn favorite_actions(lang: Language, id: ListingId) -> InlineKeyboard {
    InlineKeyboard::new().button(button(lang, TextKey::BtnContact, CallbackAction::Contact(id)))
}

pub fn my_posting_actions(lang: Language, listing: &Listing) -> InlineKeyboard {
    let toggle = if listing.is_active {
        button(lang, TextKey::BtnDeactivate, CallbackAction::Deactivate(listing.id))
    } else {
        button(lang, TextKey::BtnActivate, CallbackAction::Activate(listing.id))
    };
    InlineKeyboard::new().row(vec![
        toggle,
        button(lang, TextKey::BtnDelete, CallbackAction::Delete(listing.id)),
    ])
}

pub fn confirm_delete(lang: Language, id: ListingId) -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        button(lang, TextKey::BtnYesDelete, CallbackAction::ConfirmDelete(id)),
        button(lang, TextKey::BtnNoKeep, CallbackAction::KeepListing(id)),
    ])
}

pub fn approval(lang: Language, id: ListingId) -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        button(lang, TextKey::AdminApprove, CallbackAction::Approve(id)),
        button(lang, TextKey::AdminReject, CallbackAction::Reject(id)),
    ])
}

pub fn admin_panel(lang: Language) -> InlineKeyboard {
    InlineKeyboard::new()
        .button(button(
            lang,
            TextKey::BtnPendingListings,
            CallbackAction::Page {
                view: View::Pending,
                page: 1,
            },
        ))
        .button(menu_button(lang, TextKey::BtnMainMenu, MenuItem::Home))
}

/// Previous / "page x of y" / next, then back to the menu. Single pages only get the menu button.
pub fn pagination(lang: Language, view: View, page: u32, total_pages: u32) -> InlineKeyboard {
    let mut nav = Vec::new();
    if total_pages > 1 {
        if page > 1 {
            nav.push(button(
                lang,
                TextKey::PrevPage,
                CallbackAction::Page {
                    view,
                    page: page - 1,
                },
            ));
        }
        let (current, total) = (page.to_string(), total_pages.to_string());
        nav.push(InlineButton::new(
            i18n::format(
                lang,
                TextKey::PageInfo,
                &[("current", current.as_str()), ("total", total.as_str())],
            ),
            CallbackAction::Noop.encode(),
        ));
        if page < total_pages {
            nav.push(button(
                lang,
                TextKey::NextPage,
                CallbackAction::Page {
                    view,
                    page: page + 1,
                },
            ));
        }
    }
    InlineKeyboard::new()
        .row(nav)
        .button(menu_button(lang, TextKey::BtnMainMenu, MenuItem::Home))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(kb: &InlineKeyboard) -> Vec<CallbackAction> {
        kb.buttons()
            .map(|b| CallbackAction::parse(&b.callback_data).expect("decodable"))
            .collect()
    }

    #[test]
    fn admin_button_only_for_moderators() {
        let admin = CallbackAction::Menu(MenuItem::Admin);
        assert!(actions(&main_menu(Language::Uz, true)).contains(&admin));
        assert!(!actions(&main_menu(Language::Uz, false)).contains(&admin));
    }

    #[test]
    fn district_buttons_follow_the_chosen_region() {
        let draft = Draft {
            region: Some("tashkent_city".into()),
            ..Draft::default()
        };
        let acts = actions(&form_step(Language::Ru, Step::District, &draft));
        assert!(acts.contains(&CallbackAction::Form(FormButton::District(
            "chilanzar".into()
        ))));
        assert!(!acts.contains(&CallbackAction::Form(FormButton::District("urgut".into()))));
        assert_eq!(acts.last(), Some(&CallbackAction::Form(FormButton::Cancel)));
    }

    #[test]
    fn pagination_hides_arrows_at_the_edges() {
        let first = actions(&pagination(Language::En, View::Favorites, 1, 3));
        assert_eq!(
            first,
            vec![
                CallbackAction::Noop,
                CallbackAction::Page {
                    view: View::Favorites,
                    page: 2
                },
                CallbackAction::Menu(MenuItem::Home),
            ]
        );
        let single = actions(&pagination(Language::En, View::Favorites, 1, 1));
        assert_eq!(single, vec![CallbackAction::Menu(MenuItem::Home)]);
    }

    #[test]
    fn search_filters_carry_the_location_forward() {
        let filter = LocationFilter::district("samarkand", "urgut");
        let types = actions(&search_property_types(Language::Uz, &filter));
        assert_eq!(types[0], CallbackAction::SearchPropertyType(filter.clone()));
        assert!(types.contains(&CallbackAction::SearchPropertyType(LocationFilter {
            property_type: Some(PropertyType::Land),
            ..filter.clone()
        })));
        assert_eq!(
            types.last(),
            Some(&CallbackAction::SearchRegion("samarkand".into()))
        );

        let chosen = LocationFilter {
            property_type: Some(PropertyType::House),
            ..filter.clone()
        };
        let statuses = actions(&search_statuses(Language::Uz, &chosen));
        assert_eq!(
            statuses,
            vec![
                CallbackAction::SearchRun(LocationFilter {
                    status: Some(DealStatus::Sale),
                    ..chosen.clone()
                }),
                CallbackAction::SearchRun(LocationFilter {
                    status: Some(DealStatus::Rent),
                    ..chosen.clone()
                }),
                CallbackAction::SearchRun(chosen.clone()),
                CallbackAction::SearchDistrict {
                    region: "samarkand".into(),
                    district: Some("urgut".into()),
                },
            ]
        );
    }

    #[test]
    fn every_keyboard_fits_callback_limits() {
        let draft = Draft {
            region: Some("karakalpakstan".into()),
            ..Draft::default()
        };
        let mut all = vec![
            form_step(Language::Uz, Step::Region, &draft),
            form_step(Language::Uz, Step::District, &draft),
            form_step(Language::Uz, Step::EditMenu, &draft),
            search_regions(Language::Uz),
        ];
        for region in locations::regions() {
            all.push(search_districts(Language::Uz, region));
            for district in region.districts {
                let filter = LocationFilter {
                    property_type: Some(PropertyType::Commercial),
                    ..LocationFilter::district(region.key, district.key)
                };
                all.push(search_property_types(Language::Uz, &filter));
                all.push(search_statuses(Language::Uz, &filter));
            }
        }
        for kb in all {
            for b in kb.buttons() {
                assert!(b.callback_data.len() <= crate::messaging::callbacks::MAX_CALLBACK_DATA_LEN);
            }
        }
    }
}
