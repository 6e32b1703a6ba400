use serde::Serialize;

use crate::services::presets::Difficulty;

pub const DEFAULT_THEME_ID: i64 = 1;

#[derive(Debug)]
pub struct ThemeWordPool {
    pub id: i64,
    pub name: &'static str,
    pub easy: &'static [&'static str],
    pub normal: &'static [&'static str],
    pub hard: &'static [&'static str],
}

impl ThemeWordPool {
    /// Words for a tier; an empty tier falls back to `normal`.
    pub fn tier(&self, difficulty: Difficulty) -> &'static [&'static str] {
        let words = match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        };
        if words.is_empty() {
            self.normal
        } else {
            words
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSummary {
    pub id: i64,
    pub name: &'static str,
}

// Kept sorted by id.
static THEMES: &[ThemeWordPool] = &[
    ThemeWordPool {
        id: 1,
        name: "Школа",
        easy: &[
            "школа", "класс", "урок", "дом", "мама", "папа", "книга", "ручка", "пенал", "стол",
            "доска", "лист",
        ],
        normal: &[
            "тетрадь", "учебник", "учитель", "задание", "перемена", "портфель", "карандаш",
            "линейка", "дневник", "проверка",
        ],
        hard: &[
            "внимательный", "аккуратный", "объяснение", "проверочный", "самостоятельный",
            "подготовка",
        ],
    },
    ThemeWordPool {
        id: 2,
        name: "Животные",
        easy: &[
            "кот", "пёс", "ёж", "волк", "лиса", "заяц", "рыба", "утка", "слон", "тигр", "мышь",
            "жук",
        ],
        normal: &[
            "собака", "кошка", "кролик", "лошадь", "медведь", "воробей", "лягушка", "черепаха",
            "попугай",
        ],
        hard: &["путешествие", "наблюдение", "впечатление", "прекрасный", "осторожный"],
    },
    ThemeWordPool {
        id: 3,
        name: "Природа",
        easy: &[
            "лес", "сад", "река", "поле", "снег", "дождь", "ветер", "солнце", "облако", "трава",
            "лист",
        ],
        normal: &[
            "солнышко", "дождик", "мороз", "туман", "радуга", "озеро", "берёза", "ромашка",
            "тропинка",
        ],
        hard: &["приближение", "удивление", "воображение", "рассвет", "сверкнуло"],
    },
    ThemeWordPool {
        id: 4,
        name: "Еда",
        easy: &[
            "сок", "сыр", "хлеб", "мёд", "чай", "каша", "суп", "лук", "соль", "рис", "яблоко",
        ],
        normal: &[
            "молоко", "печенье", "компот", "котлета", "морковка", "картофель", "карамель",
            "магазин",
        ],
        hard: &["праздничный", "впечатление", "интересный", "любопытный"],
    },
];

pub fn list_themes() -> Vec<ThemeSummary> {
    let mut out: Vec<ThemeSummary> = THEMES
        .iter()
        .map(|theme| ThemeSummary {
            id: theme.id,
            name: theme.name,
        })
        .collect();
    out.sort_by_key(|theme| theme.id);
    out
}

pub fn theme_ids() -> Vec<i64> {
    list_themes().into_iter().map(|theme| theme.id).collect()
}

pub fn find_theme(theme_id: i64) -> Option<&'static ThemeWordPool> {
    THEMES.iter().find(|theme| theme.id == theme_id)
}

/// Unknown ids resolve to the default theme.
pub fn resolve_theme(theme_id: i64) -> &'static ThemeWordPool {
    find_theme(theme_id)
        .or_else(|| find_theme(DEFAULT_THEME_ID))
        .unwrap_or(&THEMES[0])
}

/// Never empty: unknown theme → default theme, empty tier → `normal`.
pub fn pool_for(theme_id: i64, difficulty: Difficulty) -> &'static [&'static str] {
    resolve_theme(theme_id).tier(difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_are_listed_by_ascending_id() {
        let ids: Vec<i64> = list_themes().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(list_themes()[0].name, "Школа");
    }

    #[test]
    fn every_registered_tier_is_non_empty() {
        for theme in THEMES {
            for difficulty in Difficulty::ALL {
                assert!(
                    !pool_for(theme.id, difficulty).is_empty(),
                    "theme {} tier {difficulty} is empty",
                    theme.id
                );
            }
        }
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(
            pool_for(999, Difficulty::Easy),
            pool_for(DEFAULT_THEME_ID, Difficulty::Easy)
        );
        assert_eq!(resolve_theme(-3).id, DEFAULT_THEME_ID);
    }

    #[test]
    fn empty_tier_falls_back_to_normal() {
        let theme = ThemeWordPool {
            id: 42,
            name: "sparse",
            easy: &[],
            normal: &["one", "two"],
            hard: &[],
        };
        assert_eq!(theme.tier(Difficulty::Easy), &["one", "two"]);
        assert_eq!(theme.tier(Difficulty::Hard), &["one", "two"]);
    }

    #[test]
    fn tier_lists_have_no_internal_duplicates() {
        for theme in THEMES {
            for difficulty in Difficulty::ALL {
                let words = theme.tier(difficulty);
                let mut seen = std::collections::HashSet::new();
                assert!(words.iter().all(|w| seen.insert(*w)));
            }
        }
    }
}
