//! Listing draft state machine.
//!
//! The form is a pure function of `(FormState, FormEvent)`: [`transition`] never talks to
//! Telegram or the database. It returns the next state plus a list of [`Effect`]s that the
//! adapter renders (prompts, rejections, the preview) or executes (submission).

use crate::{
    domain::{DealStatus, Language, NewListing, PropertyType},
    listing::derive_title,
    locations,
};

/// One question of the form, in the order they are asked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    PropertyType,
    Status,
    MaklerType,
    Region,
    District,
    Price,
    Area,
    Description,
    DescriptionReview,
    ContactInfo,
    Photos,
    Preview,
    EditMenu,
}

impl Step {
    fn next(self) -> Step {
        match self {
            Step::PropertyType => Step::Status,
            Step::Status => Step::MaklerType,
            Step::MaklerType => Step::Region,
            Step::Region => Step::District,
            Step::District => Step::Price,
            Step::Price => Step::Area,
            Step::Area => Step::Description,
            Step::Description => Step::DescriptionReview,
            Step::DescriptionReview => Step::ContactInfo,
            Step::ContactInfo => Step::Photos,
            Step::Photos | Step::Preview | Step::EditMenu => Step::Preview,
        }
    }

    /// `None` for the first step: going back from there leaves the form.
    fn prev(self) -> Option<Step> {
        match self {
            Step::PropertyType => None,
            Step::Status => Some(Step::PropertyType),
            Step::MaklerType => Some(Step::Status),
            Step::Region => Some(Step::MaklerType),
            Step::District => Some(Step::Region),
            Step::Price => Some(Step::District),
            Step::Area => Some(Step::Price),
            Step::Description => Some(Step::Area),
            Step::DescriptionReview => Some(Step::Description),
            Step::ContactInfo => Some(Step::DescriptionReview),
            Step::Photos => Some(Step::ContactInfo),
            Step::Preview => Some(Step::Photos),
            Step::EditMenu => Some(Step::Preview),
        }
    }

    /// Steps answered by typing rather than by pressing a button.
    pub fn expects_text(self) -> bool {
        matches!(
            self,
            Step::Price | Step::Area | Step::Description | Step::ContactInfo
        )
    }
}

/// Fields offered in the edit menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    PropertyType,
    Status,
    Makler,
    Location,
    Price,
    Area,
    Description,
    Contact,
    Photos,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::PropertyType,
        Field::Status,
        Field::Makler,
        Field::Location,
        Field::Price,
        Field::Area,
        Field::Description,
        Field::Contact,
        Field::Photos,
    ];

    fn step(self) -> Step {
        match self {
            Field::PropertyType => Step::PropertyType,
            Field::Status => Step::Status,
            Field::Makler => Step::MaklerType,
            Field::Location => Step::Region,
            Field::Price => Step::Price,
            Field::Area => Step::Area,
            Field::Description => Step::Description,
            Field::Contact => Step::ContactInfo,
            Field::Photos => Step::Photos,
        }
    }
}

/// Data collected so far. Nothing here is persisted until the form is submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    pub property_type: Option<PropertyType>,
    pub status: Option<DealStatus>,
    pub is_makler: Option<bool>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub price: Option<i64>,
    /// The price exactly as typed, shown in the personalized template.
    pub price_text: Option<String>,
    pub area: Option<f64>,
    pub area_text: Option<String>,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub photo_file_ids: Vec<String>,
}

impl Draft {
    /// First unanswered step, in form order. Photos are optional.
    pub fn first_missing(&self) -> Option<Step> {
        if self.property_type.is_none() {
            Some(Step::PropertyType)
        } else if self.status.is_none() {
            Some(Step::Status)
        } else if self.is_makler.is_none() {
            Some(Step::MaklerType)
        } else if self.region.is_none() {
            Some(Step::Region)
        } else if self.district.is_none() {
            Some(Step::District)
        } else if self.price.is_none() {
            Some(Step::Price)
        } else if self.area.is_none() {
            Some(Step::Area)
        } else if self.description.is_none() {
            Some(Step::Description)
        } else if self.contact_info.is_none() {
            Some(Step::ContactInfo)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// `"District, Region"` for the chosen location, if both are set.
    pub fn full_address(&self, lang: Language) -> Option<String> {
        match (&self.region, &self.district) {
            (Some(r), Some(d)) => Some(locations::full_address(lang, r, d)),
            _ => None,
        }
    }

    /// The insertable listing, or `None` while a mandatory field is missing.
    pub fn to_new_listing(&self, lang: Language) -> Option<NewListing> {
        let description = self.description.clone()?;
        Some(NewListing {
            title: derive_title(&description),
            property_type: self.property_type?,
            status: self.status?,
            is_makler: self.is_makler?,
            full_address: self.full_address(lang)?,
            region: self.region.clone()?,
            district: self.district.clone()?,
            price: self.price?,
            area: self.area?,
            contact_info: self.contact_info.clone()?,
            photo_file_ids: self.photo_file_ids.clone(),
            description,
        })
    }
}

/// An in-progress form.
#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    pub step: Step,
    pub draft: Draft,
    /// Entered through the edit menu: answering returns to the preview.
    pub editing: bool,
    /// The next description text is appended rather than replacing.
    pub appending: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormState {
    Collecting(Form),
    Submitted(Draft),
    Cancelled,
}

impl FormState {
    pub fn start() -> (FormState, Vec<Effect>) {
        let form = Form {
            step: Step::PropertyType,
            draft: Draft::default(),
            editing: false,
            appending: false,
        };
        (
            FormState::Collecting(form),
            vec![Effect::Prompt(Step::PropertyType)],
        )
    }

    /// Back to the preview with the draft untouched, e.g. after a failed save.
    pub fn resume_preview(draft: Draft) -> FormState {
        FormState::Collecting(Form {
            step: Step::Preview,
            draft,
            editing: false,
            appending: false,
        })
    }

    pub fn step(&self) -> Option<Step> {
        match self {
            FormState::Collecting(form) => Some(form.step),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            FormState::Collecting(form) => Some(&form.draft),
            FormState::Submitted(draft) => Some(draft),
            FormState::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FormState::Collecting(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    PropertyTypeChosen(PropertyType),
    StatusChosen(DealStatus),
    MaklerChosen(bool),
    RegionChosen(String),
    DistrictChosen(String),
    Text(String),
    DescriptionDone,
    DescriptionAddMore,
    /// Photos delivered by the collector; `batched` when they came as one media group.
    PhotosAppended {
        file_ids: Vec<String>,
        batched: bool,
    },
    PhotosDone,
    PhotosSkip,
    Confirm,
    OpenEditMenu,
    Edit(Field),
    BackToPreview,
    Back,
    Cancel,
}

/// Why an input was refused. The state is unchanged whenever one of these is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    InvalidPrice,
    InvalidArea,
    UnknownRegion,
    UnknownDistrict,
    EmptyText,
    /// Free text while the step expects a button press.
    UseButtons,
    /// A button from an earlier step (old keyboard) was pressed.
    Stale,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Ask the question of this step (the preview and edit menu included).
    Prompt(Step),
    Reject(Rejection),
    /// Show the personalized template for the chosen type/status.
    ShowTemplate,
    PhotosAdded {
        added: usize,
        total: usize,
        batched: bool,
    },
    PhotosCleared,
    /// Persist the submitted draft and hand it to moderation.
    Submit,
    Discard,
}

/// Advance the form by one event.
pub fn transition(state: FormState, event: FormEvent) -> (FormState, Vec<Effect>) {
    let mut form = match state {
        FormState::Collecting(form) => form,
        terminal => return (terminal, Vec::new()),
    };

    if event == FormEvent::Cancel {
        return (FormState::Cancelled, vec![Effect::Discard]);
    }
    if event == FormEvent::Back {
        return back(form);
    }

    let rejected = |form: Form, why: Rejection| (FormState::Collecting(form), vec![Effect::Reject(why)]);

    match (form.step, event) {
        (Step::PropertyType, FormEvent::PropertyTypeChosen(t)) => {
            form.draft.property_type = Some(t);
            answered(form)
        }
        (Step::Status, FormEvent::StatusChosen(s)) => {
            form.draft.status = Some(s);
            answered(form)
        }
        (Step::MaklerType, FormEvent::MaklerChosen(m)) => {
            form.draft.is_makler = Some(m);
            answered(form)
        }
        (Step::Region, FormEvent::RegionChosen(key)) => {
            if locations::find_region(&key).is_none() {
                return rejected(form, Rejection::UnknownRegion);
            }
            if form.draft.region.as_deref() != Some(key.as_str()) {
                form.draft.district = None;
            }
            form.draft.region = Some(key);
            // A district is always chosen next, even while editing.
            form.step = Step::District;
            (FormState::Collecting(form), vec![Effect::Prompt(Step::District)])
        }
        (Step::District, FormEvent::DistrictChosen(key)) => {
            let known = form
                .draft
                .region
                .as_deref()
                .and_then(|r| locations::find_district(r, &key))
                .is_some();
            if !known {
                return rejected(form, Rejection::UnknownDistrict);
            }
            form.draft.district = Some(key);
            answered(form)
        }
        (Step::Price, FormEvent::Text(text)) => match parse_price(&text) {
            Some(price) => {
                form.draft.price = Some(price);
                form.draft.price_text = Some(text.trim().to_string());
                answered(form)
            }
            None => rejected(form, Rejection::InvalidPrice),
        },
        (Step::Area, FormEvent::Text(text)) => match parse_area(&text) {
            Some(area) => {
                form.draft.area = Some(area);
                form.draft.area_text = Some(text.trim().to_string());
                let show_template = !form.editing;
                let (state, mut effects) = answered(form);
                if show_template {
                    effects.insert(0, Effect::ShowTemplate);
                }
                (state, effects)
            }
            None => rejected(form, Rejection::InvalidArea),
        },
        (Step::Description, FormEvent::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return rejected(form, Rejection::EmptyText);
            }
            let description = match form.draft.description.take() {
                Some(existing) if form.appending => format!("{existing}\n{text}"),
                _ => text.to_string(),
            };
            form.draft.description = Some(description);
            form.appending = false;
            form.step = Step::DescriptionReview;
            (
                FormState::Collecting(form),
                vec![Effect::Prompt(Step::DescriptionReview)],
            )
        }
        (Step::DescriptionReview, FormEvent::DescriptionDone) => answered(form),
        (Step::DescriptionReview, FormEvent::DescriptionAddMore) => {
            form.appending = true;
            form.step = Step::Description;
            (
                FormState::Collecting(form),
                vec![Effect::Prompt(Step::Description)],
            )
        }
        (Step::ContactInfo, FormEvent::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return rejected(form, Rejection::EmptyText);
            }
            form.draft.contact_info = Some(text.to_string());
            answered(form)
        }
        (Step::Photos | Step::Preview, FormEvent::PhotosAppended { file_ids, batched }) => {
            let added = file_ids.len();
            form.draft.photo_file_ids.extend(file_ids);
            let mut effects = vec![Effect::PhotosAdded {
                added,
                total: form.draft.photo_file_ids.len(),
                batched,
            }];
            // Late media-group flush after "done": refresh the preview.
            if form.step == Step::Preview {
                effects.push(Effect::Prompt(Step::Preview));
            }
            (FormState::Collecting(form), effects)
        }
        (Step::Photos, FormEvent::PhotosDone | FormEvent::PhotosSkip) => answered(form),
        (Step::Preview, FormEvent::Confirm) => match form.draft.first_missing() {
            None => (FormState::Submitted(form.draft), vec![Effect::Submit]),
            Some(step) => {
                form.step = step;
                form.editing = false;
                (FormState::Collecting(form), vec![Effect::Prompt(step)])
            }
        },
        (Step::Preview, FormEvent::OpenEditMenu) => {
            form.step = Step::EditMenu;
            (FormState::Collecting(form), vec![Effect::Prompt(Step::EditMenu)])
        }
        (Step::EditMenu, FormEvent::Edit(field)) => {
            let step = field.step();
            form.step = step;
            form.editing = true;
            form.appending = false;
            let mut effects = Vec::new();
            if field == Field::Photos && !form.draft.photo_file_ids.is_empty() {
                form.draft.photo_file_ids.clear();
                effects.push(Effect::PhotosCleared);
            }
            effects.push(Effect::Prompt(step));
            (FormState::Collecting(form), effects)
        }
        (Step::EditMenu, FormEvent::BackToPreview) => to_preview(form),
        (step, FormEvent::Text(_)) if !step.expects_text() => {
            rejected(form, Rejection::UseButtons)
        }
        _ => rejected(form, Rejection::Stale),
    }
}

/// The current step was answered: move on, or return to the preview when editing.
fn answered(mut form: Form) -> (FormState, Vec<Effect>) {
    if form.editing && form.draft.is_complete() {
        return to_preview(form);
    }
    let next = form.step.next();
    if next == Step::Preview {
        return to_preview(form);
    }
    form.step = next;
    (FormState::Collecting(form), vec![Effect::Prompt(next)])
}

fn to_preview(mut form: Form) -> (FormState, Vec<Effect>) {
    if let Some(missing) = form.draft.first_missing() {
        form.step = missing;
        return (FormState::Collecting(form), vec![Effect::Prompt(missing)]);
    }
    form.step = Step::Preview;
    form.editing = false;
    form.appending = false;
    (FormState::Collecting(form), vec![Effect::Prompt(Step::Preview)])
}

fn back(mut form: Form) -> (FormState, Vec<Effect>) {
    if (form.editing || form.step == Step::EditMenu) && form.draft.is_complete() {
        return to_preview(form);
    }
    match form.step.prev() {
        None => (FormState::Cancelled, vec![Effect::Discard]),
        Some(prev) => {
            form.step = prev;
            form.appending = false;
            (FormState::Collecting(form), vec![Effect::Prompt(prev)])
        }
    }
}

/// Digits of the input concatenated in order: `"50 000 so'm"` → `50000`, `"50.5"` → `505`.
///
/// `None` when there are no digits or the number does not fit an `i64`.
pub fn parse_price(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok()
}

/// Digits plus the first `.`/`,` separator: `"65.5 m²"` → `65.5`, `"1,5"` → `1.5`.
///
/// `None` when no digit is present.
pub fn parse_area(text: &str) -> Option<f64> {
    let mut cleaned = String::new();
    let mut seen_separator = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if (c == '.' || c == ',') && !seen_separator {
            seen_separator = true;
            cleaned.push('.');
        }
    }
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    cleaned.parse::<f64>().ok().filter(|a| a.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: Vec<FormEvent>) -> (FormState, Vec<Effect>) {
        let (mut state, mut last) = FormState::start();
        for ev in events {
            let (next, effects) = transition(state, ev);
            state = next;
            last = effects;
        }
        (state, last)
    }

    fn text(s: &str) -> FormEvent {
        FormEvent::Text(s.to_string())
    }

    fn up_to_photos() -> Vec<FormEvent> {
        vec![
            FormEvent::PropertyTypeChosen(PropertyType::Apartment),
            FormEvent::StatusChosen(DealStatus::Rent),
            FormEvent::MaklerChosen(false),
            FormEvent::RegionChosen("tashkent_city".into()),
            FormEvent::DistrictChosen("chilanzar".into()),
            text("50 000 so'm"),
            text("65.5"),
            text("Yangi ta'mirlangan kvartira"),
            FormEvent::DescriptionDone,
            text("+998901234567"),
        ]
    }

    fn form(state: &FormState) -> &Form {
        match state {
            FormState::Collecting(f) => f,
            other => panic!("expected collecting, got {other:?}"),
        }
    }

    #[test]
    fn price_concatenates_digits() {
        assert_eq!(parse_price("50 000 so'm"), Some(50000));
        assert_eq!(parse_price("50.5"), Some(505));
        assert_eq!(parse_price("1.2 mln"), Some(12));
        assert_eq!(parse_price("$120,000"), Some(120000));
        assert_eq!(parse_price("kelishilgan"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("99999999999999999999"), None);
    }

    #[test]
    fn area_keeps_one_separator() {
        assert_eq!(parse_area("65.5"), Some(65.5));
        assert_eq!(parse_area("65.5 m²"), Some(65.5));
        assert_eq!(parse_area("1,5"), Some(1.5));
        assert_eq!(parse_area(".5"), Some(0.5));
        assert_eq!(parse_area("100."), Some(100.0));
        assert_eq!(parse_area("1.2.3"), Some(1.23));
        assert_eq!(parse_area("katta"), None);
        assert_eq!(parse_area("."), None);
    }

    #[test]
    fn walks_every_step_in_order() {
        let (mut state, effects) = FormState::start();
        assert_eq!(effects, vec![Effect::Prompt(Step::PropertyType)]);

        let expected = [
            Step::Status,
            Step::MaklerType,
            Step::Region,
            Step::District,
            Step::Price,
            Step::Area,
            Step::Description,
            Step::DescriptionReview,
            Step::ContactInfo,
            Step::Photos,
        ];
        for (ev, step) in up_to_photos().into_iter().zip(expected) {
            let (next, effects) = transition(state, ev);
            assert_eq!(next.step(), Some(step));
            assert_eq!(effects.last(), Some(&Effect::Prompt(step)));
            state = next;
        }
    }

    #[test]
    fn area_answer_shows_template_first() {
        let mut events = up_to_photos();
        events.truncate(7);
        let (state, effects) = run(events);
        assert_eq!(state.step(), Some(Step::Description));
        assert_eq!(
            effects,
            vec![Effect::ShowTemplate, Effect::Prompt(Step::Description)]
        );
    }

    #[test]
    fn invalid_price_keeps_state() {
        let mut events = up_to_photos();
        events.truncate(5);
        let (before, _) = run(events);
        let (after, effects) = transition(before.clone(), text("narxi kelishiladi"));
        assert_eq!(after, before);
        assert_eq!(effects, vec![Effect::Reject(Rejection::InvalidPrice)]);
    }

    #[test]
    fn unknown_region_is_rejected() {
        let (state, effects) = run(vec![
            FormEvent::PropertyTypeChosen(PropertyType::House),
            FormEvent::StatusChosen(DealStatus::Sale),
            FormEvent::MaklerChosen(true),
            FormEvent::RegionChosen("atlantis".into()),
        ]);
        assert_eq!(state.step(), Some(Step::Region));
        assert_eq!(effects, vec![Effect::Reject(Rejection::UnknownRegion)]);
    }

    #[test]
    fn district_must_belong_to_region() {
        let (state, effects) = run(vec![
            FormEvent::PropertyTypeChosen(PropertyType::House),
            FormEvent::StatusChosen(DealStatus::Sale),
            FormEvent::MaklerChosen(true),
            FormEvent::RegionChosen("bukhara".into()),
            FormEvent::DistrictChosen("chilanzar".into()),
        ]);
        assert_eq!(state.step(), Some(Step::District));
        assert_eq!(effects, vec![Effect::Reject(Rejection::UnknownDistrict)]);
    }

    #[test]
    fn add_more_appends_description() {
        let (state, _) = run(vec![
            FormEvent::PropertyTypeChosen(PropertyType::Apartment),
            FormEvent::StatusChosen(DealStatus::Sale),
            FormEvent::MaklerChosen(false),
            FormEvent::RegionChosen("samarkand".into()),
            FormEvent::DistrictChosen("urgut".into()),
            text("100000"),
            text("80"),
            text("3 xonali"),
            FormEvent::DescriptionAddMore,
            text("Yevro remont"),
        ]);
        let f = form(&state);
        assert_eq!(f.step, Step::DescriptionReview);
        assert_eq!(
            f.draft.description.as_deref(),
            Some("3 xonali\nYevro remont")
        );
        assert!(!f.appending);
    }

    #[test]
    fn rent_apartment_scenario_reaches_preview_without_photos() {
        let mut events = up_to_photos();
        events.push(FormEvent::PhotosSkip);
        let (state, effects) = run(events);

        assert_eq!(effects, vec![Effect::Prompt(Step::Preview)]);
        let f = form(&state);
        assert_eq!(f.draft.price, Some(50000));
        assert_eq!(f.draft.area, Some(65.5));
        assert!(f.draft.photo_file_ids.is_empty());

        let listing = f.draft.to_new_listing(Language::Uz).unwrap();
        assert_eq!(listing.full_address, "Chilonzor, Toshkent shahri");
        assert_eq!(listing.status, DealStatus::Rent);
    }

    #[test]
    fn edit_preserves_other_fields() {
        let mut events = up_to_photos();
        events.push(FormEvent::PhotosAppended {
            file_ids: vec!["p1".into()],
            batched: false,
        });
        events.push(FormEvent::PhotosDone);
        let (preview, _) = run(events);
        let before = form(&preview).draft.clone();

        let (state, _) = transition(preview, FormEvent::OpenEditMenu);
        let (state, effects) = transition(state, FormEvent::Edit(Field::Price));
        assert_eq!(effects, vec![Effect::Prompt(Step::Price)]);
        let (state, effects) = transition(state, text("75 000"));
        assert_eq!(effects, vec![Effect::Prompt(Step::Preview)]);

        let after = &form(&state).draft;
        assert_eq!(after.price, Some(75000));
        assert_eq!(
            Draft {
                price: before.price,
                price_text: before.price_text.clone(),
                ..after.clone()
            },
            before
        );
        assert!(!form(&state).editing);
    }

    #[test]
    fn editing_location_requires_new_district() {
        let mut events = up_to_photos();
        events.push(FormEvent::PhotosSkip);
        events.push(FormEvent::OpenEditMenu);
        events.push(FormEvent::Edit(Field::Location));
        events.push(FormEvent::RegionChosen("fergana".into()));
        let (state, effects) = run(events);
        assert_eq!(effects, vec![Effect::Prompt(Step::District)]);
        assert_eq!(form(&state).draft.district, None);

        let (state, effects) = transition(state, FormEvent::DistrictChosen("kokand".into()));
        assert_eq!(effects, vec![Effect::Prompt(Step::Preview)]);
        assert_eq!(
            form(&state).draft.full_address(Language::Uz).as_deref(),
            Some("Qo'qon, Farg'ona viloyati")
        );
    }

    #[test]
    fn editing_photos_clears_them() {
        let mut events = up_to_photos();
        events.push(FormEvent::PhotosAppended {
            file_ids: vec!["a".into(), "b".into()],
            batched: true,
        });
        events.push(FormEvent::PhotosDone);
        events.push(FormEvent::OpenEditMenu);
        events.push(FormEvent::Edit(Field::Photos));
        let (state, effects) = run(events);
        assert_eq!(
            effects,
            vec![Effect::PhotosCleared, Effect::Prompt(Step::Photos)]
        );
        assert!(form(&state).draft.photo_file_ids.is_empty());
    }

    #[test]
    fn confirm_submits_complete_draft() {
        let mut events = up_to_photos();
        events.push(FormEvent::PhotosSkip);
        events.push(FormEvent::Confirm);
        let (state, effects) = run(events);
        assert_eq!(effects, vec![Effect::Submit]);
        assert!(matches!(state, FormState::Submitted(_)));

        let draft = state.draft().cloned().unwrap();
        let resumed = FormState::resume_preview(draft);
        assert_eq!(resumed.step(), Some(Step::Preview));
    }

    #[test]
    fn back_walks_backwards_and_cancels_at_start() {
        let (state, effects) = run(vec![
            FormEvent::PropertyTypeChosen(PropertyType::Land),
            FormEvent::Back,
        ]);
        assert_eq!(state.step(), Some(Step::PropertyType));
        assert_eq!(effects, vec![Effect::Prompt(Step::PropertyType)]);

        let (state, effects) = transition(state, FormEvent::Back);
        assert_eq!(state, FormState::Cancelled);
        assert_eq!(effects, vec![Effect::Discard]);
    }

    #[test]
    fn text_on_button_step_asks_for_buttons() {
        let (state, effects) = run(vec![text("kvartira")]);
        assert_eq!(state.step(), Some(Step::PropertyType));
        assert_eq!(effects, vec![Effect::Reject(Rejection::UseButtons)]);

        let (_, effects) = transition(state, FormEvent::StatusChosen(DealStatus::Sale));
        assert_eq!(effects, vec![Effect::Reject(Rejection::Stale)]);
    }

    #[test]
    fn cancel_discards_from_any_step() {
        let mut events = up_to_photos();
        events.push(FormEvent::Cancel);
        let (state, effects) = run(events);
        assert_eq!(state, FormState::Cancelled);
        assert_eq!(effects, vec![Effect::Discard]);

        let (state, effects) = transition(state, FormEvent::Confirm);
        assert_eq!(state, FormState::Cancelled);
        assert!(effects.is_empty());
    }
}
