use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale used when a localized trailer is missing
pub const FALLBACK_LOCALE: Locale = Locale::EnUs;

/// Active interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

/// Text direction implied by a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    /// Value of the HTML `dir` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }
}

/// Locale code understood by the metadata provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    ArSa,
    EnUs,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::ArSa => "ar-SA",
            Locale::EnUs => "en-US",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Language {
    /// The other language
    pub fn toggled(self) -> Self {
        match self {
            Language::Arabic => Language::English,
            Language::English => Language::Arabic,
        }
    }

    /// Short code stored in persistence ("ar" / "en")
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::Arabic => TextDirection::Rtl,
            Language::English => TextDirection::Ltr,
        }
    }

    pub fn locale(&self) -> Locale {
        match self {
            Language::Arabic => Locale::ArSa,
            Language::English => Locale::EnUs,
        }
    }

    /// Parse a stored code, `None` for anything unrecognized
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "ar" => Some(Language::Arabic),
            "en" => Some(Language::English),
            _ => None,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| format!("unknown language '{}' (expected ar or en)", s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

const ARABIC: &[(&str, &str)] = &[
    ("home", "الرئيسية"),
    ("movies", "أفلام"),
    ("tvShows", "مسلسلات"),
    ("favorites", "المفضلة"),
    ("search", "بحث..."),
    ("trending", "الرائج الآن"),
    ("popular", "الأكثر شعبية"),
    ("topRated", "الأعلى تقييماً"),
    ("watchNow", "شاهد الآن"),
    ("watchNowMovie", "مشاهدة الآن"),
    ("moreInfo", "المزيد"),
    ("noResults", "لا توجد نتائج"),
    ("loading", "جاري التحميل..."),
    ("error", "حدث خطأ"),
    ("genre", "التصنيف"),
    ("year", "السنة"),
    ("rating", "التقييم"),
    ("allGenres", "جميع التصنيفات"),
    ("allYears", "جميع السنوات"),
    ("all", "الكل"),
    ("cast", "طاقم العمل"),
    ("trailer", "العرض الدعائي"),
    ("similar", "مشابه"),
    ("overview", "القصة"),
    ("noOverview", "لا يوجد وصف متاح"),
    ("releaseDate", "تاريخ الإصدار"),
    ("runtime", "المدة"),
    ("minutes", "دقيقة"),
    ("episodes", "حلقات"),
    ("seasons", "مواسم"),
    ("season", "الموسم"),
    ("specials", "حلقات خاصة"),
    ("batch", "المجموعة:"),
    ("noFavorites", "لا توجد عناصر في المفضلة"),
    ("favoritesHint", "ابدأ بإضافة الأفلام والمسلسلات المفضلة لديك بالنقر على أيقونة القلب"),
    ("addedToFavorites", "تمت الإضافة للمفضلة"),
    ("removedFromFavorites", "تمت الإزالة من المفضلة"),
    ("anime", "أنمي"),
    ("showEpisodes", "عرض الحلقات"),
    ("hideEpisodes", "إخفاء الحلقات"),
    ("sortPopular", "الأكثر شعبية"),
    ("sortRating", "الأعلى تقييماً"),
    ("sortNewest", "الأحدث"),
    ("sortOldest", "الأقدم"),
    ("server", "الخادم"),
    ("sortBy", "ترتيب حسب"),
    ("clearFilters", "مسح الفلاتر"),
    ("searchTitle", "ابحث عن أفلام ومسلسلات"),
    ("startSearching", "ابدأ البحث عن أفلامك المفضلة"),
    ("resultsFor", "عرض نتائج البحث عن"),
    ("animeHint", "اكتشف أفضل مسلسلات الأنمي اليابانية"),
    ("page", "صفحة"),
    ("language", "اللغة"),
];

const ENGLISH: &[(&str, &str)] = &[
    ("home", "Home"),
    ("movies", "Movies"),
    ("tvShows", "TV Shows"),
    ("favorites", "Favorites"),
    ("search", "Search..."),
    ("trending", "Trending Now"),
    ("popular", "Popular"),
    ("topRated", "Top Rated"),
    ("watchNow", "Watch Now"),
    ("watchNowMovie", "Watch Now"),
    ("moreInfo", "More Info"),
    ("noResults", "No results found"),
    ("loading", "Loading..."),
    ("error", "An error occurred"),
    ("genre", "Genre"),
    ("year", "Year"),
    ("rating", "Rating"),
    ("allGenres", "All Genres"),
    ("allYears", "All Years"),
    ("all", "All"),
    ("cast", "Cast"),
    ("trailer", "Trailer"),
    ("similar", "Similar"),
    ("overview", "Overview"),
    ("noOverview", "No overview available"),
    ("releaseDate", "Release Date"),
    ("runtime", "Runtime"),
    ("minutes", "min"),
    ("episodes", "Episodes"),
    ("seasons", "Seasons"),
    ("season", "Season"),
    ("specials", "Specials"),
    ("batch", "BATCH:"),
    ("noFavorites", "No favorites yet"),
    ("favoritesHint", "Start adding your favorite movies and TV shows by clicking the heart icon"),
    ("addedToFavorites", "Added to favorites"),
    ("removedFromFavorites", "Removed from favorites"),
    ("anime", "Anime"),
    ("showEpisodes", "Show Episodes"),
    ("hideEpisodes", "Hide Episodes"),
    ("sortPopular", "Most Popular"),
    ("sortRating", "Highest Rated"),
    ("sortNewest", "Newest"),
    ("sortOldest", "Oldest"),
    ("server", "Server"),
    ("sortBy", "Sort By"),
    ("clearFilters", "Clear Filters"),
    ("searchTitle", "Search Movies & TV Shows"),
    ("startSearching", "Start searching for your favorite movies"),
    ("resultsFor", "Showing results for"),
    ("animeHint", "Discover the best Japanese Anime series"),
    ("page", "Page"),
    ("language", "Language"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Arabic => ARABIC,
        Language::English => ENGLISH,
    }
}

/// Look up `key` for `language`, falling back to the key itself
pub fn translate<'a>(language: Language, key: &'a str) -> &'a str {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Label for a season button ("Season 2", "الموسم 2", or the specials label)
pub fn season_label(language: Language, season_number: u32) -> String {
    if season_number == 0 {
        translate(language, "specials").to_string()
    } else {
        format!("{} {}", translate(language, "season"), season_number)
    }
}
