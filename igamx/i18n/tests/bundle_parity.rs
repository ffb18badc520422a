use igamx_i18n::{Catalog, Locale, Namespace};

#[test]
fn can_find_every_key_in_every_locale() {
    let catalog = Catalog::embedded();

    let missing = catalog.missing_keys().unwrap();

    assert!(missing.is_empty(), "bundles diverge: {missing:#?}");
}

#[test]
fn can_find_every_namespace_in_every_locale() {
    let catalog = Catalog::embedded();

    for locale in Locale::ALL {
        let bundle = catalog.load(locale).unwrap();
        for namespace in Namespace::ALL {
            assert!(
                bundle.namespace(namespace).is_some_and(|v| v.is_object()),
                "{locale} is missing namespace {namespace}"
            );
        }
    }
}

#[test]
fn can_resolve_non_empty_strings_for_every_key() {
    let catalog = Catalog::embedded();

    for locale in Locale::ALL {
        let bundle = catalog.bundle(locale);
        let t = catalog.translator(locale);
        for key in bundle.keys() {
            assert!(!t.t(key).trim().is_empty(), "{locale}: {key} is empty");
        }
    }
}

#[test]
fn can_resolve_locale_specific_strings() {
    let catalog = Catalog::embedded();

    let titles: Vec<String> = Locale::ALL
        .into_iter()
        .map(|l| catalog.scoped(l, Namespace::PrivacyPolicyPage).t("title"))
        .collect();

    assert_eq!(
        titles,
        vec!["Privacy Policy", "隐私政策", "Politique de confidentialité"]
    );
}

#[test]
fn can_interpolate_last_updated_in_every_locale() {
    let catalog = Catalog::embedded();

    for locale in Locale::ALL {
        let t = catalog.scoped(locale, Namespace::TermsOfServicePage);
        let line = t.t_with("last_updated", &[("date", "2025-06-01")]);
        assert!(line.contains("2025-06-01"), "{locale}: {line}");
        assert!(!line.contains("{date}"), "{locale}: {line}");
    }
}

#[test]
fn can_label_every_locale_in_the_switcher() {
    let catalog = Catalog::embedded();
    let t = catalog.scoped(Locale::Fr, Namespace::LanguageSwitcher);

    for locale in Locale::ALL {
        assert_eq!(t.t(locale.code()), locale.native_name());
    }
}

#[test]
fn can_resolve_testimonials_in_every_locale() {
    let catalog = Catalog::embedded();

    for locale in Locale::ALL {
        let t = catalog.scoped(locale, Namespace::ClientsSection);
        for id in ["alpha_gaming", "beta_sports", "gamma_casino"] {
            assert!(t.has(&format!("testimonials.{id}.quote")), "{locale}: {id}");
        }
    }
    assert_eq!(
        catalog.scoped(Locale::Zh, Namespace::ClientsSection).t("testimonials.beta_sports.role"),
        "Beta Sports 首席执行官"
    );
}
