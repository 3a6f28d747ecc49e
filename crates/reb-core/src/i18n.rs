//! Localized UI strings.
//!
//! Every user-visible string is a [`TextKey`]. Lookups go through [`resolve`], which reports
//! a [`MissingTranslation`] instead of silently echoing the key; [`text`] applies the explicit
//! fallback to Uzbek (the complete table).

use std::fmt;

use crate::domain::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextKey {
    // General
    Welcome,
    MainMenu,
    Info,
    Help,
    ChooseLanguage,
    LanguageChanged,
    GenericError,
    RateLimited,
    Cancelled,
    SessionExpired,
    UseButtons,
    NotAllowed,
    ListingNotFound,

    // Menu buttons
    BtnPostListing,
    BtnMyPostings,
    BtnSearch,
    BtnFavorites,
    BtnInfo,
    BtnLanguage,
    BtnAdminPanel,
    BtnMainMenu,
    BtnBack,

    // Choices
    PropertyApartment,
    PropertyHouse,
    PropertyCommercial,
    PropertyLand,
    StatusSale,
    StatusRent,
    MaklerYes,
    MaklerNo,

    // Form prompts
    AskPropertyType,
    AskStatus,
    AskMakler,
    AskRegion,
    AskDistrict,
    AskPrice,
    AskArea,
    AskDescription,
    AskDescriptionMore,
    DescriptionReview,
    AskContact,
    AskPhotos,

    // Form rejections
    InvalidPrice,
    InvalidArea,
    UnknownRegion,
    UnknownDistrict,
    EmptyText,

    // Form buttons
    BtnDescriptionDone,
    BtnDescriptionAddMore,
    BtnPhotosDone,
    BtnPhotosSkip,

    // Photos
    PhotoAdded,
    PhotosBatchAdded,
    PhotosOverLimit,
    PhotosCleared,

    // Personalized template
    TemplateHeader,
    TemplateLandSale,
    TemplateLandRent,
    TemplateCommercialSale,
    TemplateCommercialRent,
    TemplateResidentialSale,
    TemplateResidentialRent,
    TemplateNote,

    // Preview / edit
    PreviewTitle,
    ConfirmPosting,
    BtnConfirmPost,
    BtnEditListing,
    BtnCancelPosting,
    EditWhat,
    EditPropertyType,
    EditStatus,
    EditMakler,
    EditLocation,
    EditPrice,
    EditArea,
    EditDescription,
    EditContact,
    EditPhotos,
    BtnBackToPreview,

    // Submission
    ListingSubmitted,
    SaveFailed,

    // Channel post (published in Uzbek only)
    ChannelContact,
    ChannelAddress,

    // Listing cards
    LineListingId,
    LineStatus,
    LineAddress,
    LinePrice,
    LineArea,
    LineDescription,
    LineFavorites,
    BadgePending,
    BadgeApproved,
    BadgeRejected,
    BadgeInactive,

    // My postings
    MyPostingsEmpty,
    MyPostingsHeader,
    BtnActivate,
    BtnDeactivate,
    BtnDelete,
    ConfirmDelete,
    BtnYesDelete,
    BtnNoKeep,
    Deleted,
    DeleteCancelled,
    Activated,
    Deactivated,
    FavoriteRemovedNotice,

    // Search
    SearchChoose,
    BtnSearchKeyword,
    BtnSearchLocation,
    AskKeyword,
    AskSearchRegion,
    AskSearchDistrict,
    BtnWholeRegion,
    AskSearchPropertyType,
    BtnAllPropertyTypes,
    AskSearchStatus,
    BtnAllStatuses,
    NoResults,
    SearchResultsHeader,

    // Favorites
    BtnAddFavorite,
    BtnContact,
    FavoriteAdded,
    FavoriteAlready,
    FavoriteUnavailable,
    FavoritesEmpty,
    FavoritesHeader,
    ContactAlert,

    // Pagination
    PageInfo,
    NextPage,
    PrevPage,

    // Moderation
    AdminPanel,
    BtnPendingListings,
    AdminNewListing,
    AdminSubmitter,
    AdminApprove,
    AdminReject,
    AdminApprovedNotification,
    AdminRejectedNotification,
    NoPendingListings,
    AskRejectReason,
    ReasonRequired,
    AdminApprovedDone,
    AdminRejectedDone,
    AdminPublishFailed,
    AdminOnly,
    AlreadyReviewed,
    ModeratorNotice,
}

/// A key has no entry in the requested language's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no {lang:?} translation for {key:?}")]
pub struct MissingTranslation {
    pub lang: Language,
    pub key: TextKey,
}

/// Look up `key` in exactly one language table.
pub fn resolve(lang: Language, key: TextKey) -> Result<&'static str, MissingTranslation> {
    let found = match lang {
        Language::Uz => Some(uz(key)),
        Language::Ru => ru(key),
        Language::En => en(key),
    };
    found.ok_or(MissingTranslation { lang, key })
}

/// Look up `key`, falling back to Uzbek when the language table has no entry.
pub fn text(lang: Language, key: TextKey) -> &'static str {
    match resolve(lang, key) {
        Ok(s) => s,
        Err(missing) => {
            tracing::debug!(%missing, "falling back to uz");
            uz(key)
        }
    }
}

/// [`text`] with `{name}` placeholders substituted.
pub fn format(lang: Language, key: TextKey, args: &[(&str, &str)]) -> String {
    fill(text(lang, key), args)
}

/// Substitute `{name}` placeholders. Unknown placeholders are left untouched.
///
/// One pass over the template: substituted values are never scanned again, so user text that
/// happens to contain `{area}` stays as typed.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = after.find('}').and_then(|end| {
            let name = &after[..end];
            args.iter()
                .find(|(n, _)| *n == name)
                .map(|(_, value)| (*value, end))
        });
        match hit {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl fmt::Display for TextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn uz(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        Welcome => "🏠 Assalomu alaykum! Ko'chmas mulk e'lonlari botiga xush kelibsiz.\n\nBu yerda e'lon joylashingiz, e'lonlarni qidirishingiz va sevimlilarga qo'shishingiz mumkin.",
        MainMenu => "🏠 Asosiy menyu",
        Info => "ℹ️ <b>Bot haqida</b>\n\n📝 E'lon joylash: uy-joy turi, manzil, narx va rasmlarni kiriting.\n✅ Har bir e'lon moderator tomonidan tekshiriladi va tasdiqlangach kanalga joylanadi.\n🔍 Qidiruv: kalit so'z yoki joylashuv bo'yicha.\n❤️ Sevimlilar: yoqqan e'lonlarni saqlab qo'ying.",
        Help => "Buyruqlar:\n/start - asosiy menyu\n/cancel - joriy amalni bekor qilish\n/help - yordam",
        ChooseLanguage => "🌐 Tilni tanlang:",
        LanguageChanged => "✅ Til o'zgartirildi",
        GenericError => "❌ Xatolik yuz berdi. Iltimos qaytadan urinib ko'ring.",
        RateLimited => "⏳ Juda ko'p so'rov. {seconds} soniyadan keyin urinib ko'ring.",
        Cancelled => "❌ Bekor qilindi",
        SessionExpired => "⌛ Bu amal eskirgan. Iltimos, menyudan qaytadan boshlang.",
        UseButtons => "👇 Iltimos, tugmalardan foydalaning.",
        NotAllowed => "🚫 Sizda bu amal uchun ruxsat yo'q.",
        ListingNotFound => "❌ E'lon topilmadi.",

        BtnPostListing => "📝 E'lon joylash",
        BtnMyPostings => "📋 Mening e'lonlarim",
        BtnSearch => "🔍 Qidirish",
        BtnFavorites => "❤️ Sevimlilar",
        BtnInfo => "ℹ️ Ma'lumot",
        BtnLanguage => "🌐 Til",
        BtnAdminPanel => "🛠 Admin panel",
        BtnMainMenu => "🏠 Asosiy menyu",
        BtnBack => "◀️ Orqaga",

        PropertyApartment => "🏢 Kvartira",
        PropertyHouse => "🏠 Hovli uy",
        PropertyCommercial => "🏪 Tijorat",
        PropertyLand => "🌳 Yer",
        StatusSale => "💰 Sotish",
        StatusRent => "📅 Ijara",
        MaklerYes => "👨‍💼 Ha, makler",
        MaklerNo => "👤 Yo'q, maklersiz",

        AskPropertyType => "🏠 Uy-joy turini tanlang:",
        AskStatus => "🎯 Maqsadni tanlang:",
        AskMakler => "👨‍💼 Siz maklermisiz?",
        AskRegion => "📍 Viloyatni tanlang:",
        AskDistrict => "🏘 Tumanni tanlang:",
        AskPrice => "💰 Narxni kiriting (masalan: 50 000 000 so'm):",
        AskArea => "📐 Maydonni kiriting (m²):",
        AskDescription => "📝 Endi e'lon matnini yozing. Yuqoridagi namunadan foydalanishingiz mumkin:",
        AskDescriptionMore => "📝 Qo'shimcha matnni yozing:",
        DescriptionReview => "✅ Tavsif qabul qilindi. Yana ma'lumot qo'shasizmi?",
        AskContact => "📞 Aloqa uchun telefon raqamingizni kiriting:",
        AskPhotos => "📸 E'lon rasmlarini yuboring (10 tagacha). Tugatgach \"Tayyor\" tugmasini bosing.",

        InvalidPrice => "❌ Narx noto'g'ri. Iltimos, raqam kiriting (masalan: 50000000).",
        InvalidArea => "❌ Maydon noto'g'ri. Iltimos, raqam kiriting (masalan: 65.5).",
        UnknownRegion => "❌ Bunday viloyat topilmadi. Iltimos, ro'yxatdan tanlang.",
        UnknownDistrict => "❌ Bunday tuman topilmadi. Iltimos, ro'yxatdan tanlang.",
        EmptyText => "❌ Matn bo'sh bo'lmasligi kerak.",

        BtnDescriptionDone => "✅ Tayyor",
        BtnDescriptionAddMore => "➕ Yana qo'shish",
        BtnPhotosDone => "✅ Tayyor",
        BtnPhotosSkip => "⏭ Rasmsiz davom etish",

        PhotoAdded => "📸 Rasm qo'shildi. Jami: {total}",
        PhotosBatchAdded => "📸 {added} ta rasm qo'shildi. Jami: {total}",
        PhotosOverLimit => "⚠️ Kanalga faqat birinchi {max} ta rasm joylanadi.",
        PhotosCleared => "🗑 Avvalgi rasmlar o'chirildi.",

        TemplateHeader => "✨ Sizning ma'lumotlaringiz bilan tayyor namuna:",
        TemplateLandSale => "🧱 Bo'sh yer sotiladi\n📍 Hudud: {location}\n📐 Maydoni: {area} sotix\n💰 Narxi: {price}\n📄 Hujjatlari: tayyor/tayyorlanmoqda\n🚗 Yo'l: asfalt yo'lga yaqin/uzoq\n💧 Kommunikatsiya: suv, svet yaqin/uzoq\n(Qo'shimcha ma'lumot kiritish mumkin)",
        TemplateLandRent => "🧱 Bo'sh yer ijaraga beriladi\n📍 Hudud: {location}\n📐 Maydoni: {area} sotix\n💰 Narxi: {price}\n🕒 Muddat: qisqa yoki uzoq muddatga\n🚗 Yo'l: asfalt yo'lga yaqin/uzoq\n💧 Kommunikatsiya: suv, svet yaqin/uzoq\n(Qo'shimcha ma'lumot kiritish mumkin)",
        TemplateCommercialSale => "🏢 Tijorat ob'ekti sotiladi\n📍 Tuman: {location}\n📐 Maydoni: {area} m²\n💰 Narxi: {price}\n📄 Hujjat: noturar bino/tijorat ob'ekti sifatida\n📌 Hozirda faoliyat yuritmoqda/bo'sh\n(Qo'shimcha ma'lumot kiritish mumkin)",
        TemplateCommercialRent => "🏢 Tijorat ob'ekti ijaraga beriladi\n📍 Tuman: {location}\n📐 Maydoni: {area} m²\n💰 Narxi: {price}\n🕒 Muddat: qisqa yoki uzoq muddatga\n📌 Hozirda faoliyat yuritmoqda/bo'sh\n(Qo'shimcha ma'lumot kiritish mumkin)",
        TemplateResidentialSale => "🏠 UY-JOY SOTILADI\n📍 {location}\n💰 Narxi: {price}\n📐 Maydon: {area} m²\n🛏 Xonalar: __ xonali\n♨️ Kommunal: gaz, suv, svet bor\n🪚 Holati: yevro remont yoki o'rtacha\n🛋 Jihoz: jihozli yoki jihozsiz\n🏢 Qavat: __/__",
        TemplateResidentialRent => "🏠 KVARTIRA IJARAGA BERILADI\n📍 {location}\n💰 Narxi: {price}\n📐 Maydon: {area} m²\n🛏 Xonalar: __ xonali\n♨️ Kommunal: gaz, suv, svet bor\n🪚 Holati: yevro remont yoki o'rtacha\n🛋 Jihoz: jihozli yoki jihozsiz\n🕒 Muddat: qisqa yoki uzoq muddatga\n👥 Kimga: Shariy nikohga / oilaga / studentlarga",
        TemplateNote => "🔴 Eslatma\nMa'lumotlar qatorida tel raqamingizni bot so'ramaguncha yozmang, aks holda sizni telingiz jiringlashdan to'xtamaydi va biz siz yuborgan xabarni botdan o'chirib tashlash imkonsiz",

        PreviewTitle => "👀 E'loningiz quyidagicha ko'rinadi:\n\n<i>Tasdiqlansa, aynan shu formatda kanalga joylanadi:</i>",
        ConfirmPosting => "E'lonni yuborish uchun tasdiqlang:",
        BtnConfirmPost => "✅ Ha, yuborish",
        BtnEditListing => "✏️ Tahrirlash",
        BtnCancelPosting => "❌ Bekor qilish",
        EditWhat => "Nimani tahrir qilmoqchisiz?",
        EditPropertyType => "🏠 Uy-joy turi",
        EditStatus => "🎯 Maqsad (sotish/ijara)",
        EditMakler => "👨‍💼 Makler holati",
        EditLocation => "📍 Joylashuv",
        EditPrice => "💰 Narx",
        EditArea => "📐 Maydon",
        EditDescription => "📝 Tavsif",
        EditContact => "📞 Aloqa",
        EditPhotos => "📸 Rasmlar",
        BtnBackToPreview => "◀️ Ko'rib chiqishga qaytish",

        ListingSubmitted => "✅ E'loningiz moderatsiyaga yuborildi!\n🆔 E'lon ID: #{id}\n\nTasdiqlangach kanalga joylanadi.",
        SaveFailed => "❌ E'lonni saqlashda xatolik. Iltimos, yana \"Ha, yuborish\" tugmasini bosing.",

        ChannelContact => "📞 Aloqa:",
        ChannelAddress => "🗺 Manzil:",

        LineListingId => "🆔 <b>E'lon #{id}</b>",
        LineStatus => "📊 <b>Status:</b> {status}",
        LineAddress => "🗺 <b>Manzil:</b> {address}",
        LinePrice => "💰 <b>Narx:</b> {price} so'm",
        LineArea => "📐 <b>Maydon:</b> {area} m²",
        LineDescription => "📝 <b>Tavsif:</b> {description}",
        LineFavorites => "❤️ <b>Sevimlilar:</b> {count} ta",
        BadgePending => "🟡 Kutilmoqda",
        BadgeApproved => "🟢 Faol",
        BadgeRejected => "🔴 Rad etilgan",
        BadgeInactive => "⚪️ Nofaol",

        MyPostingsEmpty => "📭 Sizda hali e'lonlar yo'q.",
        MyPostingsHeader => "📋 <b>Mening e'lonlarim</b> (jami: {total})",
        BtnActivate => "▶️ Faollashtirish",
        BtnDeactivate => "⏸ Nofaol qilish",
        BtnDelete => "🗑 O'chirish",
        ConfirmDelete => "⚠️ E'lon #{id} butunlay o'chirilsinmi? Bu amalni qaytarib bo'lmaydi.",
        BtnYesDelete => "✅ Ha, o'chirish",
        BtnNoKeep => "❌ Yo'q",
        Deleted => "🗑 E'lon o'chirildi.",
        DeleteCancelled => "👌 O'chirish bekor qilindi.",
        Activated => "▶️ E'lon faollashtirildi.",
        Deactivated => "⏸ E'lon nofaol qilindi.",
        FavoriteRemovedNotice => "💔 Sevimlilaringizdan 1 e'lon o'chirildi",

        SearchChoose => "🔍 Qidiruv turini tanlang:",
        BtnSearchKeyword => "🔤 Kalit so'z bo'yicha",
        BtnSearchLocation => "📍 Joylashuv bo'yicha",
        AskKeyword => "🔤 Qidiruv uchun kalit so'z kiriting:",
        AskSearchRegion => "📍 Qidiruv uchun viloyatni tanlang:",
        AskSearchDistrict => "🏘 Tumanni tanlang:",
        BtnWholeRegion => "🌐 Butun viloyat",
        AskSearchPropertyType => "🏠 Uy-joy turini tanlang:",
        BtnAllPropertyTypes => "🏢 Barcha turlar",
        AskSearchStatus => "🎯 Sotuv yoki ijara?",
        BtnAllStatuses => "🔘 Barchasi",
        NoResults => "😔 Hech narsa topilmadi.",
        SearchResultsHeader => "🔍 <b>Qidiruv natijalari</b> (jami: {total})",

        BtnAddFavorite => "❤️ Sevimlilarga",
        BtnContact => "📞 Aloqa",
        FavoriteAdded => "❤️ Sevimlilarga qo'shildi",
        FavoriteAlready => "Bu e'lon allaqachon sevimlilarda",
        FavoriteUnavailable => "Bu e'lon hozir mavjud emas",
        FavoritesEmpty => "💔 Sevimlilar ro'yxati bo'sh.",
        FavoritesHeader => "❤️ <b>Sevimlilar</b> (jami: {total})",
        ContactAlert => "📞 Aloqa: {contact}",

        PageInfo => "📄 Sahifa {current} / {total}",
        NextPage => "Keyingi ▶️",
        PrevPage => "◀️ Oldingi",

        AdminPanel => "🛠 <b>Admin panel</b>\n\n⏳ Tasdiqlanishi kutilayotgan: {pending} ta",
        BtnPendingListings => "⏳ Kutilayotgan e'lonlar",
        AdminNewListing => "🆕 <b>YANGI E'LON TEKSHIRISH UCHUN</b>",
        AdminSubmitter => "👤 Foydalanuvchi: {name} ({username})\n🆔 E'lon ID: #{id}",
        AdminApprove => "✅ Tasdiqlash",
        AdminReject => "❌ Rad etish",
        AdminApprovedNotification => "✅ E'loningiz tasdiqlandi va kanalga joylandi!",
        AdminRejectedNotification => "❌ E'loningiz rad etildi.\n\nSabab: {reason}",
        NoPendingListings => "📭 Tasdiqlanishi kutilayotgan e'lonlar yo'q",
        AskRejectReason => "✍️ E'lon #{id} uchun rad etish sababini yozing:",
        ReasonRequired => "❌ Sabab bo'sh bo'lmasligi kerak.",
        AdminApprovedDone => "✅ E'lon #{id} tasdiqlandi va kanalga joylandi.",
        AdminRejectedDone => "❌ E'lon #{id} rad etildi. Muallifga xabar yuborildi.",
        AdminPublishFailed => "⚠️ E'lon #{id} tasdiqlandi, lekin kanalga joylab bo'lmadi.",
        AdminOnly => "🚫 Faqat moderatorlar uchun.",
        AlreadyReviewed => "ℹ️ Bu e'lon allaqachon ko'rib chiqilgan.",
        ModeratorNotice => "🆕 Yangi e'lon #{id} tekshirishni kutmoqda.",
    }
}

fn ru(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    let s = match key {
        Welcome => "🏠 Здравствуйте! Добро пожаловать в бот объявлений о недвижимости.\n\nЗдесь можно разместить объявление, искать объявления и добавлять их в избранное.",
        MainMenu => "🏠 Главное меню",
        Info => "ℹ️ <b>О боте</b>\n\n📝 Размещение: укажите тип, адрес, цену и фото.\n✅ Каждое объявление проверяет модератор, после одобрения оно публикуется в канале.\n🔍 Поиск: по ключевому слову или местоположению.\n❤️ Избранное: сохраняйте понравившиеся объявления.",
        Help => "Команды:\n/start - главное меню\n/cancel - отменить текущее действие\n/help - помощь",
        ChooseLanguage => "🌐 Выберите язык:",
        LanguageChanged => "✅ Язык изменен",
        GenericError => "❌ Произошла ошибка. Пожалуйста, попробуйте еще раз.",
        RateLimited => "⏳ Слишком много запросов. Попробуйте через {seconds} сек.",
        Cancelled => "❌ Отменено",
        SessionExpired => "⌛ Это действие устарело. Пожалуйста, начните заново из меню.",
        UseButtons => "👇 Пожалуйста, используйте кнопки.",
        NotAllowed => "🚫 У вас нет прав на это действие.",
        ListingNotFound => "❌ Объявление не найдено.",

        BtnPostListing => "📝 Разместить объявление",
        BtnMyPostings => "📋 Мои объявления",
        BtnSearch => "🔍 Поиск",
        BtnFavorites => "❤️ Избранное",
        BtnInfo => "ℹ️ Информация",
        BtnLanguage => "🌐 Язык",
        BtnAdminPanel => "🛠 Админ панель",
        BtnMainMenu => "🏠 Главное меню",
        BtnBack => "◀️ Назад",

        PropertyApartment => "🏢 Квартира",
        PropertyHouse => "🏠 Дом",
        PropertyCommercial => "🏪 Коммерческая",
        PropertyLand => "🌳 Участок",
        StatusSale => "💰 Продажа",
        StatusRent => "📅 Аренда",
        MaklerYes => "👨‍💼 Да, риелтор",
        MaklerNo => "👤 Нет, собственник",

        AskPropertyType => "🏠 Выберите тип недвижимости:",
        AskStatus => "🎯 Выберите цель:",
        AskMakler => "👨‍💼 Вы риелтор?",
        AskRegion => "📍 Выберите область:",
        AskDistrict => "🏘 Выберите район:",
        AskPrice => "💰 Введите цену (например: 50 000 000 сум):",
        AskArea => "📐 Введите площадь (м²):",
        AskDescription => "📝 Теперь напишите текст объявления. Можно использовать шаблон выше:",
        AskDescriptionMore => "📝 Напишите дополнительный текст:",
        DescriptionReview => "✅ Описание принято. Добавить еще информацию?",
        AskContact => "📞 Введите номер телефона для связи:",
        AskPhotos => "📸 Отправьте фото объявления (до 10). Затем нажмите \"Готово\".",

        InvalidPrice => "❌ Неверная цена. Пожалуйста, введите число (например: 50000000).",
        InvalidArea => "❌ Неверная площадь. Пожалуйста, введите число (например: 65.5).",
        UnknownRegion => "❌ Такая область не найдена. Пожалуйста, выберите из списка.",
        UnknownDistrict => "❌ Такой район не найден. Пожалуйста, выберите из списка.",
        EmptyText => "❌ Текст не должен быть пустым.",

        BtnDescriptionDone => "✅ Готово",
        BtnDescriptionAddMore => "➕ Добавить еще",
        BtnPhotosDone => "✅ Готово",
        BtnPhotosSkip => "⏭ Продолжить без фото",

        PhotoAdded => "📸 Фото добавлено. Всего: {total}",
        PhotosBatchAdded => "📸 Добавлено фото: {added}. Всего: {total}",
        PhotosOverLimit => "⚠️ В канал будут размещены только первые {max} фото.",
        PhotosCleared => "🗑 Предыдущие фото удалены.",

        TemplateHeader => "✨ Готовый шаблон с вашими данными:",
        TemplateLandSale => "🧱 Продается пустой участок\n📍 Район: {location}\n📐 Площадь: {area} соток\n💰 Цена: {price}\n📄 Документы: готовы/готовятся\n🚗 Дорога: близко/далеко к асфальту\n💧 Коммуникации: вода, свет рядом/далеко\n(Можно добавить дополнительную информацию)",
        TemplateLandRent => "🧱 Сдается в аренду пустой участок\n📍 Район: {location}\n📐 Площадь: {area} соток\n💰 Цена: {price}\n🕒 Срок: краткосрочно или долгосрочно\n🚗 Дорога: близко/далеко к асфальту\n💧 Коммуникации: вода, свет рядом/далеко\n(Можно добавить дополнительную информацию)",
        TemplateCommercialSale => "🏢 Продается коммерческий объект\n📍 Район: {location}\n📐 Площадь: {area} м²\n💰 Цена: {price}\n📄 Документ: нежилое здание/коммерческий объект\n📌 В настоящее время работает/пустует\n(Можно добавить дополнительную информацию)",
        TemplateCommercialRent => "🏢 Сдается в аренду коммерческий объект\n📍 Район: {location}\n📐 Площадь: {area} м²\n💰 Цена: {price}\n🕒 Срок: краткосрочно или долгосрочно\n📌 В настоящее время работает/пустует\n(Можно добавить дополнительную информацию)",
        TemplateResidentialSale => "🏠 ПРОДАЕТСЯ НЕДВИЖИМОСТЬ\n📍 {location}\n💰 Цена: {price}\n📐 Площадь: {area} м²\n🛏 Комнаты: __-комнатная\n♨️ Коммунальные: газ, вода, свет есть\n🪚 Состояние: евроремонт или среднее\n🛋 Мебель: с мебелью или без мебели\n🏢 Этаж: __/__",
        TemplateResidentialRent => "🏠 КВАРТИРА СДАЕТСЯ В АРЕНДУ\n📍 {location}\n💰 Цена: {price}\n📐 Площадь: {area} м²\n🛏 Комнаты: __-комнатная\n♨️ Коммунальные: газ, вода, свет есть\n🪚 Состояние: евроремонт или среднее\n🛋 Мебель: с мебелью или без мебели\n🕒 Срок: краткосрочно или долгосрочно\n👥 Для кого: для гражданского брака / для семьи / для студентов",
        TemplateNote => "🔴 Примечание\nНе пишите свой номер телефона в тексте, пока бот не попросит, иначе ваш телефон не перестанет звонить и мы не сможем удалить ваше сообщение из бота",

        PreviewTitle => "👀 Ваше объявление будет выглядеть так:\n\n<i>Если одобрено, будет размещено в канале именно в таком формате:</i>",
        ConfirmPosting => "Подтвердите отправку объявления:",
        BtnConfirmPost => "✅ Да, отправить",
        BtnEditListing => "✏️ Редактировать",
        BtnCancelPosting => "❌ Отмена",
        EditWhat => "Что вы хотите отредактировать?",
        EditPropertyType => "🏠 Тип недвижимости",
        EditStatus => "🎯 Цель (продажа/аренда)",
        EditMakler => "👨‍💼 Статус риелтора",
        EditLocation => "📍 Местоположение",
        EditPrice => "💰 Цена",
        EditArea => "📐 Площадь",
        EditDescription => "📝 Описание",
        EditContact => "📞 Контакты",
        EditPhotos => "📸 Фотографии",
        BtnBackToPreview => "◀️ Вернуться к просмотру",

        ListingSubmitted => "✅ Ваше объявление отправлено на модерацию!\n🆔 ID объявления: #{id}\n\nПосле одобрения оно будет размещено в канале.",
        SaveFailed => "❌ Ошибка при сохранении объявления. Пожалуйста, нажмите \"Да, отправить\" еще раз.",

        LineListingId => "🆔 <b>Объявление #{id}</b>",
        LineStatus => "📊 <b>Статус:</b> {status}",
        LineAddress => "🗺 <b>Адрес:</b> {address}",
        LinePrice => "💰 <b>Цена:</b> {price} сум",
        LineArea => "📐 <b>Площадь:</b> {area} м²",
        LineDescription => "📝 <b>Описание:</b> {description}",
        LineFavorites => "❤️ <b>В избранном:</b> {count}",
        BadgePending => "🟡 Ожидает",
        BadgeApproved => "🟢 Активно",
        BadgeRejected => "🔴 Отклонено",
        BadgeInactive => "⚪️ Неактивно",

        MyPostingsEmpty => "📭 У вас пока нет объявлений.",
        MyPostingsHeader => "📋 <b>Мои объявления</b> (всего: {total})",
        BtnActivate => "▶️ Активировать",
        BtnDeactivate => "⏸ Деактивировать",
        BtnDelete => "🗑 Удалить",
        ConfirmDelete => "⚠️ Удалить объявление #{id} навсегда? Это действие нельзя отменить.",
        BtnYesDelete => "✅ Да, удалить",
        BtnNoKeep => "❌ Нет",
        Deleted => "🗑 Объявление удалено.",
        DeleteCancelled => "👌 Удаление отменено.",
        Activated => "▶️ Объявление активировано.",
        Deactivated => "⏸ Объявление деактивировано.",
        FavoriteRemovedNotice => "💔 Из вашего избранного удалено 1 объявление",

        SearchChoose => "🔍 Выберите тип поиска:",
        BtnSearchKeyword => "🔤 По ключевому слову",
        BtnSearchLocation => "📍 По местоположению",
        AskKeyword => "🔤 Введите ключевое слово для поиска:",
        AskSearchRegion => "📍 Выберите область для поиска:",
        AskSearchDistrict => "🏘 Выберите район:",
        BtnWholeRegion => "🌐 Вся область",
        AskSearchPropertyType => "🏠 Выберите тип недвижимости:",
        BtnAllPropertyTypes => "🏢 Все типы",
        AskSearchStatus => "🎯 Продажа или аренда?",
        BtnAllStatuses => "🔘 Все",
        NoResults => "😔 Ничего не найдено.",
        SearchResultsHeader => "🔍 <b>Результаты поиска</b> (всего: {total})",

        BtnAddFavorite => "❤️ В избранное",
        BtnContact => "📞 Контакты",
        FavoriteAdded => "❤️ Добавлено в избранное",
        FavoriteAlready => "Это объявление уже в избранном",
        FavoriteUnavailable => "Это объявление сейчас недоступно",
        FavoritesEmpty => "💔 Список избранного пуст.",
        FavoritesHeader => "❤️ <b>Избранное</b> (всего: {total})",
        ContactAlert => "📞 Контакты: {contact}",

        PageInfo => "📄 Страница {current} / {total}",
        NextPage => "Далее ▶️",
        PrevPage => "◀️ Назад",

        AdminPanel => "🛠 <b>Админ панель</b>\n\n⏳ Ожидают одобрения: {pending}",
        BtnPendingListings => "⏳ Ожидающие объявления",
        AdminNewListing => "🆕 <b>НОВОЕ ОБЪЯВЛЕНИЕ ДЛЯ ПРОВЕРКИ</b>",
        AdminSubmitter => "👤 Пользователь: {name} ({username})\n🆔 ID объявления: #{id}",
        AdminApprove => "✅ Одобрить",
        AdminReject => "❌ Отклонить",
        AdminApprovedNotification => "✅ Ваше объявление одобрено и размещено в канале!",
        AdminRejectedNotification => "❌ Ваше объявление отклонено.\n\nПричина: {reason}",
        NoPendingListings => "📭 Нет объявлений ожидающих одобрения",
        AskRejectReason => "✍️ Напишите причину отклонения объявления #{id}:",
        ReasonRequired => "❌ Причина не должна быть пустой.",
        AdminApprovedDone => "✅ Объявление #{id} одобрено и размещено в канале.",
        AdminRejectedDone => "❌ Объявление #{id} отклонено. Автор уведомлен.",
        AdminPublishFailed => "⚠️ Объявление #{id} одобрено, но не удалось разместить его в канале.",
        AdminOnly => "🚫 Только для модераторов.",
        AlreadyReviewed => "ℹ️ Это объявление уже рассмотрено.",
        ModeratorNotice => "🆕 Новое объявление #{id} ожидает проверки.",

        ChannelContact | ChannelAddress => return None,
    };
    Some(s)
}

fn en(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    let s = match key {
        Welcome => "🏠 Hello! Welcome to the real estate listings bot.\n\nHere you can post listings, search listings and save them to favorites.",
        MainMenu => "🏠 Main menu",
        Info => "ℹ️ <b>About the bot</b>\n\n📝 Posting: enter the property type, address, price and photos.\n✅ Every listing is reviewed by a moderator and published to the channel once approved.\n🔍 Search: by keyword or by location.\n❤️ Favorites: keep the listings you like.",
        Help => "Commands:\n/start - main menu\n/cancel - cancel the current action\n/help - help",
        ChooseLanguage => "🌐 Choose a language:",
        LanguageChanged => "✅ Language changed",
        GenericError => "❌ An error occurred. Please try again.",
        RateLimited => "⏳ Too many requests. Try again in {seconds}s.",
        Cancelled => "❌ Cancelled",
        SessionExpired => "⌛ This action has expired. Please start again from the menu.",
        UseButtons => "👇 Please use the buttons.",
        NotAllowed => "🚫 You are not allowed to do this.",
        ListingNotFound => "❌ Listing not found.",

        BtnPostListing => "📝 Post a listing",
        BtnMyPostings => "📋 My listings",
        BtnSearch => "🔍 Search",
        BtnFavorites => "❤️ Favorites",
        BtnInfo => "ℹ️ Info",
        BtnLanguage => "🌐 Language",
        BtnAdminPanel => "🛠 Admin panel",
        BtnMainMenu => "🏠 Main menu",
        BtnBack => "◀️ Back",

        PropertyApartment => "🏢 Apartment",
        PropertyHouse => "🏠 House",
        PropertyCommercial => "🏪 Commercial",
        PropertyLand => "🌳 Land",
        StatusSale => "💰 Sale",
        StatusRent => "📅 Rent",
        MaklerYes => "👨‍💼 Yes, realtor",
        MaklerNo => "👤 No, owner",

        AskPropertyType => "🏠 Choose the property type:",
        AskStatus => "🎯 Choose the purpose:",
        AskMakler => "👨‍💼 Are you a realtor?",
        AskRegion => "📍 Choose the region:",
        AskDistrict => "🏘 Choose the district:",
        AskPrice => "💰 Enter the price (e.g. 50 000 000 sum):",
        AskArea => "📐 Enter the area (m²):",
        AskDescription => "📝 Now write the listing text. You can use the template above:",
        AskDescriptionMore => "📝 Write the additional text:",
        DescriptionReview => "✅ Description saved. Add more information?",
        AskContact => "📞 Enter your contact phone number:",
        AskPhotos => "📸 Send the listing photos (up to 10). Press \"Done\" when finished.",

        InvalidPrice => "❌ Invalid price. Please enter a number (e.g. 50000000).",
        InvalidArea => "❌ Invalid area. Please enter a number (e.g. 65.5).",
        UnknownRegion => "❌ Unknown region. Please choose one from the list.",
        UnknownDistrict => "❌ Unknown district. Please choose one from the list.",
        EmptyText => "❌ The text must not be empty.",

        BtnDescriptionDone => "✅ Done",
        BtnDescriptionAddMore => "➕ Add more",
        BtnPhotosDone => "✅ Done",
        BtnPhotosSkip => "⏭ Continue without photos",

        PhotoAdded => "📸 Photo added. Total: {total}",
        PhotosBatchAdded => "📸 {added} photos added. Total: {total}",
        PhotosOverLimit => "⚠️ Only the first {max} photos will be posted to the channel.",
        PhotosCleared => "🗑 Previous photos were removed.",

        TemplateHeader => "✨ Ready template with your data:",
        TemplateLandSale => "🧱 Empty land for sale\n📍 Area: {location}\n📐 Size: {area} acres\n💰 Price: {price}\n📄 Documents: ready/being prepared\n🚗 Road: close/far to paved road\n💧 Communications: water, electricity nearby/far\n(Additional information can be added)",
        TemplateLandRent => "🧱 Empty land for rent\n📍 Area: {location}\n📐 Size: {area} acres\n💰 Price: {price}\n🕒 Period: short-term or long-term\n🚗 Road: close/far to paved road\n💧 Communications: water, electricity nearby/far\n(Additional information can be added)",
        TemplateCommercialSale => "🏢 Commercial property for sale\n📍 District: {location}\n📐 Area: {area} m²\n💰 Price: {price}\n📄 Document: non-residential building/commercial property\n📌 Currently operating/vacant\n(Additional information can be added)",
        TemplateCommercialRent => "🏢 Commercial property for rent\n📍 District: {location}\n📐 Area: {area} m²\n💰 Price: {price}\n🕒 Period: short-term or long-term\n📌 Currently operating/vacant\n(Additional information can be added)",
        TemplateResidentialSale => "🏠 PROPERTY FOR SALE\n📍 {location}\n💰 Price: {price}\n📐 Area: {area} m²\n🛏 Rooms: __-room\n♨️ Utilities: gas, water, electricity available\n🪚 Condition: euro renovation or average\n🛋 Furniture: furnished or unfurnished\n🏢 Floor: __/__",
        TemplateResidentialRent => "🏠 APARTMENT FOR RENT\n📍 {location}\n💰 Price: {price}\n📐 Area: {area} m²\n🛏 Rooms: __-room\n♨️ Utilities: gas, water, electricity available\n🪚 Condition: euro renovation or average\n🛋 Furniture: furnished or unfurnished\n🕒 Period: short-term or long-term\n👥 For whom: for civil marriage / for family / for students",
        TemplateNote => "🔴 Note\nDo not write your phone number in the text until the bot asks for it, otherwise your phone will not stop ringing and we cannot delete your message from the bot",

        PreviewTitle => "👀 Your listing will look like this:\n\n<i>If approved, it will be posted to the channel in exactly this format:</i>",
        ConfirmPosting => "Confirm posting submission:",
        BtnConfirmPost => "✅ Yes, submit",
        BtnEditListing => "✏️ Edit",
        BtnCancelPosting => "❌ Cancel",
        EditWhat => "What would you like to edit?",
        EditPropertyType => "🏠 Property type",
        EditStatus => "🎯 Purpose (sale/rent)",
        EditMakler => "👨‍💼 Realtor status",
        EditLocation => "📍 Location",
        EditPrice => "💰 Price",
        EditArea => "📐 Area",
        EditDescription => "📝 Description",
        EditContact => "📞 Contact",
        EditPhotos => "📸 Photos",
        BtnBackToPreview => "◀️ Back to preview",

        ListingSubmitted => "✅ Your listing was sent for moderation!\n🆔 Listing ID: #{id}\n\nIt will be posted to the channel once approved.",
        SaveFailed => "❌ Failed to save the listing. Please press \"Yes, submit\" again.",

        LineListingId => "🆔 <b>Listing #{id}</b>",
        LineStatus => "📊 <b>Status:</b> {status}",
        LineAddress => "🗺 <b>Address:</b> {address}",
        LinePrice => "💰 <b>Price:</b> {price} sum",
        LineArea => "📐 <b>Area:</b> {area} m²",
        LineDescription => "📝 <b>Description:</b> {description}",
        LineFavorites => "❤️ <b>Favorites:</b> {count}",
        BadgePending => "🟡 Pending",
        BadgeApproved => "🟢 Active",
        BadgeRejected => "🔴 Rejected",
        BadgeInactive => "⚪️ Inactive",

        MyPostingsEmpty => "📭 You have no listings yet.",
        MyPostingsHeader => "📋 <b>My listings</b> (total: {total})",
        BtnActivate => "▶️ Activate",
        BtnDeactivate => "⏸ Deactivate",
        BtnDelete => "🗑 Delete",
        ConfirmDelete => "⚠️ Delete listing #{id} permanently? This cannot be undone.",
        BtnYesDelete => "✅ Yes, delete",
        BtnNoKeep => "❌ No",
        Deleted => "🗑 Listing deleted.",
        DeleteCancelled => "👌 Deletion cancelled.",
        Activated => "▶️ Listing activated.",
        Deactivated => "⏸ Listing deactivated.",
        FavoriteRemovedNotice => "💔 1 listing was removed from your favorites",

        SearchChoose => "🔍 Choose the search type:",
        BtnSearchKeyword => "🔤 By keyword",
        BtnSearchLocation => "📍 By location",
        AskKeyword => "🔤 Enter a search keyword:",
        AskSearchRegion => "📍 Choose a region to search:",
        AskSearchDistrict => "🏘 Choose the district:",
        BtnWholeRegion => "🌐 Whole region",
        AskSearchPropertyType => "🏠 Choose the property type:",
        BtnAllPropertyTypes => "🏢 All types",
        AskSearchStatus => "🎯 Sale or rent?",
        BtnAllStatuses => "🔘 All",
        NoResults => "😔 Nothing found.",
        SearchResultsHeader => "🔍 <b>Search results</b> (total: {total})",

        BtnAddFavorite => "❤️ Favorite",
        BtnContact => "📞 Contact",
        FavoriteAdded => "❤️ Added to favorites",
        FavoriteAlready => "This listing is already in your favorites",
        FavoriteUnavailable => "This listing is not available right now",
        FavoritesEmpty => "💔 Your favorites list is empty.",
        FavoritesHeader => "❤️ <b>Favorites</b> (total: {total})",
        ContactAlert => "📞 Contact: {contact}",

        PageInfo => "📄 Page {current} / {total}",
        NextPage => "Next ▶️",
        PrevPage => "◀️ Previous",

        AdminPanel => "🛠 <b>Admin panel</b>\n\n⏳ Pending approval: {pending}",
        BtnPendingListings => "⏳ Pending listings",
        AdminNewListing => "🆕 <b>NEW LISTING FOR REVIEW</b>",
        AdminSubmitter => "👤 User: {name} ({username})\n🆔 Listing ID: #{id}",
        AdminApprove => "✅ Approve",
        AdminReject => "❌ Reject",
        AdminApprovedNotification => "✅ Your listing has been approved and posted to the channel!",
        AdminRejectedNotification => "❌ Your listing has been rejected.\n\nReason: {reason}",
        NoPendingListings => "📭 No listings pending approval",
        AskRejectReason => "✍️ Write the rejection reason for listing #{id}:",
        ReasonRequired => "❌ The reason must not be empty.",
        AdminApprovedDone => "✅ Listing #{id} approved and posted to the channel.",
        AdminRejectedDone => "❌ Listing #{id} rejected. The author was notified.",
        AdminPublishFailed => "⚠️ Listing #{id} was approved but could not be posted to the channel.",
        AdminOnly => "🚫 Moderators only.",
        AlreadyReviewed => "ℹ️ This listing has already been reviewed.",
        ModeratorNotice => "🆕 New listing #{id} is waiting for review.",

        ChannelContact | ChannelAddress => return None,
    };
    Some(s)
}
