//! Static region → district catalog used for keyboards and address assembly.

use crate::domain::Language;

#[derive(Clone, Copy, Debug)]
struct Names {
    uz: &'static str,
    ru: &'static str,
    en: &'static str,
}

impl Names {
    fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::Uz => self.uz,
            Language::Ru => self.ru,
            Language::En => self.en,
        }
    }
}

#[derive(Debug)]
pub struct District {
    pub key: &'static str,
    names: Names,
}

impl District {
    pub fn name(&self, lang: Language) -> &'static str {
        self.names.get(lang)
    }
}

#[derive(Debug)]
pub struct Region {
    pub key: &'static str,
    names: Names,
    pub districts: &'static [District],
}

impl Region {
    pub fn name(&self, lang: Language) -> &'static str {
        self.names.get(lang)
    }

    pub fn district(&self, key: &str) -> Option<&'static District> {
        self.districts.iter().find(|d| d.key == key)
    }
}

const fn n(uz: &'static str, ru: &'static str, en: &'static str) -> Names {
    Names { uz, ru, en }
}

const fn d(key: &'static str, names: Names) -> District {
    District { key, names }
}

static REGIONS: &[Region] = &[
    Region {
        key: "tashkent_city",
        names: n("Toshkent shahri", "город Ташкент", "Tashkent city"),
        districts: &[
            d("chilanzar", n("Chilonzor", "Чиланзар", "Chilanzar")),
            d("yunusabad", n("Yunusobod", "Юнусабад", "Yunusabad")),
            d("mirzo_ulugbek", n("Mirzo Ulug'bek", "Мирзо-Улугбек", "Mirzo Ulugbek")),
            d("yakkasaray", n("Yakkasaroy", "Яккасарай", "Yakkasaray")),
            d("sergeli", n("Sergeli", "Сергели", "Sergeli")),
            d("shayxontohur", n("Shayxontohur", "Шайхантахур", "Shaykhantakhur")),
            d("mirobod", n("Mirobod", "Мирабад", "Mirabad")),
            d("uchtepa", n("Uchtepa", "Учтепа", "Uchtepa")),
            d("olmazor", n("Olmazor", "Алмазар", "Almazar")),
            d("yashnobod", n("Yashnobod", "Яшнабад", "Yashnabad")),
            d("bektemir", n("Bektemir", "Бектемир", "Bektemir")),
        ],
    },
    Region {
        key: "tashkent_region",
        names: n("Toshkent viloyati", "Ташкентская область", "Tashkent region"),
        districts: &[
            d("chirchiq", n("Chirchiq", "Чирчик", "Chirchiq")),
            d("angren", n("Angren", "Ангрен", "Angren")),
            d("olmaliq", n("Olmaliq", "Алмалык", "Almalyk")),
            d("zangiota", n("Zangiota", "Зангиата", "Zangiata")),
            d("qibray", n("Qibray", "Кибрай", "Kibray")),
        ],
    },
    Region {
        key: "samarkand",
        names: n("Samarqand viloyati", "Самаркандская область", "Samarkand region"),
        districts: &[
            d("samarkand_city", n("Samarqand shahri", "город Самарканд", "Samarkand city")),
            d("urgut", n("Urgut", "Ургут", "Urgut")),
            d("kattaqorgon", n("Kattaqo'rg'on", "Каттакурган", "Kattakurgan")),
            d("pastdargom", n("Pastdarg'om", "Пастдаргом", "Pastdargom")),
        ],
    },
    Region {
        key: "bukhara",
        names: n("Buxoro viloyati", "Бухарская область", "Bukhara region"),
        districts: &[
            d("bukhara_city", n("Buxoro shahri", "город Бухара", "Bukhara city")),
            d("kogon", n("Kogon", "Каган", "Kagan")),
            d("gijduvon", n("G'ijduvon", "Гиждуван", "Gijduvan")),
            d("vobkent", n("Vobkent", "Вабкент", "Vabkent")),
        ],
    },
    Region {
        key: "andijan",
        names: n("Andijon viloyati", "Андижанская область", "Andijan region"),
        districts: &[
            d("andijan_city", n("Andijon shahri", "город Андижан", "Andijan city")),
            d("asaka", n("Asaka", "Асака", "Asaka")),
            d("xonobod", n("Xonobod", "Ханабад", "Khanabad")),
            d("shahrixon", n("Shahrixon", "Шахрихан", "Shahrikhan")),
        ],
    },
    Region {
        key: "fergana",
        names: n("Farg'ona viloyati", "Ферганская область", "Fergana region"),
        districts: &[
            d("fergana_city", n("Farg'ona shahri", "город Фергана", "Fergana city")),
            d("margilan", n("Marg'ilon", "Маргилан", "Margilan")),
            d("kokand", n("Qo'qon", "Коканд", "Kokand")),
            d("quvasoy", n("Quvasoy", "Кувасай", "Kuvasay")),
        ],
    },
    Region {
        key: "namangan",
        names: n("Namangan viloyati", "Наманганская область", "Namangan region"),
        districts: &[
            d("namangan_city", n("Namangan shahri", "город Наманган", "Namangan city")),
            d("chust", n("Chust", "Чуст", "Chust")),
            d("kosonsoy", n("Kosonsoy", "Касансай", "Kasansay")),
            d("pop", n("Pop", "Пап", "Pap")),
        ],
    },
    Region {
        key: "kashkadarya",
        names: n("Qashqadaryo viloyati", "Кашкадарьинская область", "Kashkadarya region"),
        districts: &[
            d("karshi", n("Qarshi", "Карши", "Karshi")),
            d("shahrisabz", n("Shahrisabz", "Шахрисабз", "Shahrisabz")),
            d("kitob", n("Kitob", "Китаб", "Kitab")),
            d("guzor", n("G'uzor", "Гузар", "Guzar")),
        ],
    },
    Region {
        key: "surkhandarya",
        names: n("Surxondaryo viloyati", "Сурхандарьинская область", "Surkhandarya region"),
        districts: &[
            d("termez", n("Termiz", "Термез", "Termez")),
            d("denov", n("Denov", "Денау", "Denau")),
            d("sherobod", n("Sherobod", "Шерабад", "Sherabad")),
        ],
    },
    Region {
        key: "khorezm",
        names: n("Xorazm viloyati", "Хорезмская область", "Khorezm region"),
        districts: &[
            d("urgench", n("Urganch", "Ургенч", "Urgench")),
            d("khiva", n("Xiva", "Хива", "Khiva")),
            d("xonqa", n("Xonqa", "Ханка", "Khanka")),
        ],
    },
    Region {
        key: "navoi",
        names: n("Navoiy viloyati", "Навоийская область", "Navoi region"),
        districts: &[
            d("navoi_city", n("Navoiy shahri", "город Навои", "Navoi city")),
            d("zarafshon", n("Zarafshon", "Зарафшан", "Zarafshan")),
            d("karmana", n("Karmana", "Кармана", "Karmana")),
        ],
    },
    Region {
        key: "jizzakh",
        names: n("Jizzax viloyati", "Джизакская область", "Jizzakh region"),
        districts: &[
            d("jizzakh_city", n("Jizzax shahri", "город Джизак", "Jizzakh city")),
            d("gallaorol", n("G'allaorol", "Галляарал", "Gallaorol")),
            d("zomin", n("Zomin", "Зомин", "Zaamin")),
        ],
    },
    Region {
        key: "syrdarya",
        names: n("Sirdaryo viloyati", "Сырдарьинская область", "Syrdarya region"),
        districts: &[
            d("guliston", n("Guliston", "Гулистан", "Gulistan")),
            d("yangiyer", n("Yangiyer", "Янгиер", "Yangiyer")),
            d("shirin", n("Shirin", "Ширин", "Shirin")),
        ],
    },
    Region {
        key: "karakalpakstan",
        names: n(
            "Qoraqalpog'iston Respublikasi",
            "Республика Каракалпакстан",
            "Republic of Karakalpakstan",
        ),
        districts: &[
            d("nukus", n("Nukus", "Нукус", "Nukus")),
            d("khojeli", n("Xo'jayli", "Ходжейли", "Khojeli")),
            d("beruniy", n("Beruniy", "Беруни", "Beruniy")),
        ],
    },
];

pub fn regions() -> &'static [Region] {
    REGIONS
}

pub fn find_region(key: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.key == key)
}

pub fn find_district(region_key: &str, district_key: &str) -> Option<&'static District> {
    find_region(region_key).and_then(|r| r.district(district_key))
}

/// `"District, Region"` in the given language. Unknown keys are shown raw.
pub fn full_address(lang: Language, region_key: &str, district_key: &str) -> String {
    match find_region(region_key) {
        Some(region) => match region.district(district_key) {
            Some(district) => format!("{}, {}", district.name(lang), region.name(lang)),
            None => format!("{district_key}, {}", region.name(lang)),
        },
        None => format!("{district_key}, {region_key}"),
    }
}

/// Region display name, or the raw key when it is not in the catalog.
pub fn region_name(lang: Language, region_key: &str) -> String {
    find_region(region_key)
        .map(|r| r.name(lang).to_string())
        .unwrap_or_else(|| region_key.to_string())
}
