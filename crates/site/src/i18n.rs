//! Static English and Arabic strings for the shared layout.
//!
//! Lookup falls back to English, then to a caller-supplied default, then
//! to the key itself. Placeholders such as `{year}` are left for the caller.

use std::collections::HashMap;
use std::sync::LazyLock;

use noble_paints_core::Locale;

/// `(key, english, arabic)`; an empty Arabic entry falls back to English.
const ENTRIES: &[(&str, &str, &str)] = &[
    // Navigation
    ("nav.home", "Home", "الرئيسية"),
    ("nav.about", "About Us", "من نحن"),
    ("nav.products", "Products", "المنتجات"),
    ("nav.categories", "Categories", "الفئات"),
    ("nav.catalogs", "Catalogs", "الكتالوجات"),
    ("nav.datasheets", "Technical Datasheets", "النشرات الفنية"),
    ("nav.news", "News", "الأخبار"),
    ("nav.certificates", "Certificates", "الشهادات"),
    ("nav.approvals", "Approvals", "الاعتمادات"),
    ("nav.colors", "Colors", "الألوان"),
    ("nav.ral_colors", "RAL Colors", "ألوان RAL"),
    ("nav.calculator", "Paint Calculator", "حاسبة الدهان"),
    ("nav.find_store", "Find a Store", "ابحث عن متجر"),
    ("nav.social", "Social Media", "وسائل التواصل"),
    ("nav.contact", "Contact Us", "اتصل بنا"),
    ("nav.language", "Language", "اللغة"),
    // Footer
    (
        "footer.rights",
        "© {year} Noble Paints. All rights reserved.",
        "© {year} نوبل للدهانات. جميع الحقوق محفوظة.",
    ),
    ("footer.follow", "Follow us", "تابعنا"),
    // Home
    ("home.featured", "Featured Products", "منتجات مميزة"),
    ("home.latest", "Latest Products", "أحدث المنتجات"),
    // Listings
    ("filter.category", "Category", "الفئة"),
    ("filter.country", "Country", "الدولة"),
    ("filter.search", "Search by name", "ابحث بالاسم"),
    ("filter.all", "All", "الكل"),
    ("filter.apply", "Filter", "تصفية"),
    ("listing.empty", "Nothing to show yet.", "لا يوجد محتوى بعد."),
    ("pager.previous", "Previous", "السابق"),
    ("pager.next", "Next", "التالي"),
    ("catalogs.download", "Download", "تحميل"),
    ("catalogs.view", "View", "عرض"),
    ("datasheets.open", "Open datasheet", "فتح النشرة"),
    ("products.similar", "Similar Products", "منتجات مشابهة"),
    ("products.datasheet", "Datasheet", "النشرة الفنية"),
    ("news.latest", "Latest News", "آخر الأخبار"),
    ("news.most_viewed", "Most Viewed", "الأكثر مشاهدة"),
    ("news.views", "views", "مشاهدة"),
    // Contact
    ("contact.sent", "Message sent successfully.", "تم إرسال الرسالة بنجاح."),
    // Authentication
    ("auth.login.title", "Sign in", "تسجيل الدخول"),
    ("auth.login.username", "Username", "اسم المستخدم"),
    ("auth.login.password", "Password", "كلمة المرور"),
    ("auth.login.submit", "Sign in", "دخول"),
    ("auth.login.success", "Welcome back!", "مرحباً بعودتك!"),
    (
        "auth.login.error",
        "Incorrect username or password.",
        "اسم المستخدم أو كلمة المرور غير صحيحة.",
    ),
    ("auth.logout.success", "Signed out successfully.", "تم تسجيل الخروج بنجاح."),
    ("auth.logout", "Sign out", "تسجيل الخروج"),
    // Control panel
    ("cp.title", "Control Panel", "لوحة التحكم"),
    ("cp.categories", "Categories", "الفئات"),
    ("cp.products", "Products", "المنتجات"),
    ("cp.catalogs", "Catalogs", "الكتالوجات"),
    ("cp.datasheets", "Technical Datasheets", "النشرات الفنية"),
    ("cp.news", "News", "الأخبار"),
    ("cp.certificates", "Certificates", "الشهادات"),
    ("cp.approvals", "Approvals", "الاعتمادات"),
    ("cp.social", "Social Icons", "أيقونات التواصل"),
    ("cp.show", "Rows per page", "عدد الصفوف"),
    ("cp.add", "Add", "إضافة"),
    ("cp.edit", "Edit", "تعديل"),
    ("cp.delete", "Delete", "حذف"),
];

static TABLE: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        ENTRIES
            .iter()
            .map(|(key, en, ar)| (*key, (*en, *ar)))
            .collect()
    });

fn lookup(key: &str, locale: Locale) -> Option<&'static str> {
    let &(en, ar) = TABLE.get(key)?;
    match locale {
        Locale::Ar if !ar.is_empty() => Some(ar),
        _ => Some(en),
    }
}

/// Translate `key`, falling back to English, then `default`, then the key.
#[must_use]
pub fn translate<'a>(key: &'a str, locale: Locale, default: Option<&'a str>) -> &'a str {
    lookup(key, locale).or(default).unwrap_or(key)
}

/// Translation handle passed to templates.
#[derive(Debug, Clone, Copy)]
pub struct I18n {
    pub locale: Locale,
}

impl I18n {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Translated string for `key`, or the key itself when unknown.
    #[must_use]
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(key, self.locale, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_lookup() {
        assert_eq!(translate("nav.home", Locale::Ar, None), "الرئيسية");
        assert_eq!(translate("nav.home", Locale::En, None), "Home");
    }

    #[test]
    fn test_unknown_key_uses_default_then_key() {
        assert_eq!(translate("nav.missing", Locale::Ar, Some("Fallback")), "Fallback");
        assert_eq!(translate("nav.missing", Locale::Ar, None), "nav.missing");
    }

    #[test]
    fn test_keys_are_unique() {
        assert_eq!(TABLE.len(), ENTRIES.len());
    }
}
