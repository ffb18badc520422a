use igamx_i18n::provider::seed_locale;
use igamx_i18n::{
    Catalog, I18nError, I18nProvider, Locale, MemoryPreferences, Namespace, PreferenceStore,
};
use std::sync::Arc;

fn mount(preferences: &MemoryPreferences, server_locale: Option<Locale>) -> igamx_i18n::I18nContext {
    I18nProvider::new(Arc::new(Catalog::embedded()), Arc::new(preferences.clone()))
        .mount(server_locale)
}

#[test]
fn can_mount_with_server_locale() {
    let context = mount(&MemoryPreferences::new(), Some(Locale::Fr));

    assert_eq!(context.current_locale(), Locale::Fr);
    assert_eq!(context.scoped_i18n(Namespace::Navbar).t("about"), "À propos");
}

#[test]
fn can_read_translations_after_changing_locale() {
    let context = mount(&MemoryPreferences::new(), None);
    assert_eq!(context.scoped_i18n(Namespace::Navbar).t("services"), "Services");

    context.change_locale("zh").unwrap();

    assert_eq!(context.current_locale(), Locale::Zh);
    assert_eq!(context.scoped_i18n(Namespace::Navbar).t("services"), "服务");
    assert_eq!(context.i18n().t("navbar.services"), "服务");
}

#[tokio::test]
async fn can_notify_every_subscriber_on_change() {
    let context = mount(&MemoryPreferences::new(), Some(Locale::En));
    let mut navbar = context.subscribe();
    let mut footer = context.clone().subscribe();

    context.change_locale("fr").unwrap();

    navbar.changed().await.unwrap();
    footer.changed().await.unwrap();
    assert_eq!(*navbar.borrow_and_update(), Locale::Fr);
    assert_eq!(*footer.borrow_and_update(), Locale::Fr);
}

#[tokio::test]
async fn can_skip_notification_when_locale_is_unchanged() {
    let context = mount(&MemoryPreferences::new(), Some(Locale::Zh));
    let receiver = context.subscribe();

    context.change_locale("zh").unwrap();

    assert!(!receiver.has_changed().unwrap());
}

#[test]
fn can_ignore_unsupported_locale_change() {
    let preferences = MemoryPreferences::new();
    let context = mount(&preferences, Some(Locale::Fr));
    let receiver = context.subscribe();

    let result = context.change_locale("de");

    assert!(matches!(result, Err(I18nError::UnsupportedLocale(code)) if code == "de"));
    assert_eq!(context.current_locale(), Locale::Fr);
    assert!(!receiver.has_changed().unwrap());
    assert_eq!(preferences.load(), None);
}

#[test]
fn can_honor_persisted_choice_on_next_visit() {
    let preferences = MemoryPreferences::new();
    let first_visit = mount(&preferences, None);
    first_visit.change_locale("zh-CN").unwrap();
    first_visit.unmount();

    let next_visit = mount(&preferences, None);

    assert_eq!(seed_locale(None, &preferences), Locale::Zh);
    assert_eq!(next_visit.current_locale(), Locale::Zh);
    assert_eq!(next_visit.scoped_i18n(Namespace::Navbar).t("services"), "服务");
}

#[test]
fn can_let_last_change_win() {
    let context = mount(&MemoryPreferences::new(), None);
    let other_handle = context.clone();

    context.change_locale("fr").unwrap();
    other_handle.change_locale("zh").unwrap();

    assert_eq!(context.current_locale(), Locale::Zh);
    assert_eq!(other_handle.current_locale(), Locale::Zh);
}

#[tokio::test]
async fn can_close_subscriptions_on_unmount() {
    let context = mount(&MemoryPreferences::new(), None);
    let mut receiver = context.subscribe();

    context.unmount();

    assert!(receiver.changed().await.is_err());
}
