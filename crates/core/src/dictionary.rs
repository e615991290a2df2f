//! Curated code/label data.
//!
//! This is the only place the literal vocabulary lives. Codes must match what the
//! classification backend emits and accepts; labels are Russian display strings.

/// Disease codes and their labels.
pub(crate) const DISEASE_LABELS: &[(&str, &str)] = &[
    ("BKL", "Доброкачественные кератозоподобные поражения"),
    ("AK", "Актинический кератоз"),
    ("BCC", "Базально-клеточная карцинома"),
    ("DF", "Дерматофиброма"),
    ("NV", "Меланоцитарные невусы"),
    ("VASC", "Сосудистые поражения"),
    ("MEL", "Меланома"),
];

/// Legacy disease codes and the code that replaced them.
pub(crate) const DISEASE_ALIASES: &[(&str, &str)] = &[("NV_M", "NV")];

/// Anatomical location codes and their labels.
pub(crate) const LOCATION_LABELS: &[(&str, &str)] = &[
    ("UE", "Верхняя конечность"),
    ("UK", "Неизвестно"),
    ("SC", "Волосистая часть головы"),
    ("GE", "Гениталии"),
    ("NK", "Шея"),
    ("LE", "Нижняя конечность"),
    ("EA", "Ухо"),
    ("TR", "Туловище"),
    ("FT", "Стопа"),
    ("AC", "Акральная область"),
    ("AB", "Живот"),
    ("BK", "Спина"),
    ("CH", "Грудь"),
    ("FA", "Лицо"),
    ("HA", "Кисть"),
];

pub(crate) const LOCATION_ALIASES: &[(&str, &str)] = &[];

/// Disease selection order, most prevalent class first.
pub(crate) const DISEASE_OPTION_ORDER: &[&str] = &["NV", "MEL", "BCC", "BKL", "AK", "DF", "VASC"];

/// Location selection order.
pub(crate) const LOCATION_OPTION_ORDER: &[&str] = &[
    "TR", "LE", "UE", "SC", "NK", "FA", "AB", "BK", "CH", "GE", "EA", "FT", "HA", "AC", "UK",
];
