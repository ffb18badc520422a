use crate::I18nError;
use std::fmt;
use std::str::FromStr;

/// A top-level grouping of translation keys inside every bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Metadata,
    Navbar,
    Hero,
    ServicesSection,
    TechnologySection,
    BenefitsSection,
    WhyChooseUsSection,
    AiAdvisorSection,
    AboutUsSection,
    ClientsSection,
    ContactSection,
    Footer,
    LanguageSwitcher,
    PrivacyPolicyPage,
    TermsOfServicePage,
}

impl Namespace {
    pub const ALL: [Namespace; 15] = [
        Namespace::Metadata,
        Namespace::Navbar,
        Namespace::Hero,
        Namespace::ServicesSection,
        Namespace::TechnologySection,
        Namespace::BenefitsSection,
        Namespace::WhyChooseUsSection,
        Namespace::AiAdvisorSection,
        Namespace::AboutUsSection,
        Namespace::ClientsSection,
        Namespace::ContactSection,
        Namespace::Footer,
        Namespace::LanguageSwitcher,
        Namespace::PrivacyPolicyPage,
        Namespace::TermsOfServicePage,
    ];

    /// Returns the key of this namespace in the bundle documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Metadata => "metadata",
            Namespace::Navbar => "navbar",
            Namespace::Hero => "hero",
            Namespace::ServicesSection => "services_section",
            Namespace::TechnologySection => "technology_section",
            Namespace::BenefitsSection => "benefits_section",
            Namespace::WhyChooseUsSection => "why_choose_us_section",
            Namespace::AiAdvisorSection => "ai_advisor_section",
            Namespace::AboutUsSection => "about_us_section",
            Namespace::ClientsSection => "clients_section",
            Namespace::ContactSection => "contact_section",
            Namespace::Footer => "footer",
            Namespace::LanguageSwitcher => "language_switcher",
            Namespace::PrivacyPolicyPage => "privacy_policy_page",
            Namespace::TermsOfServicePage => "terms_of_service_page",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|namespace| namespace.as_str() == s)
            .ok_or_else(|| I18nError::UnknownNamespace(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_every_namespace_from_its_key() {
        for namespace in Namespace::ALL {
            assert_eq!(namespace.as_str().parse::<Namespace>().unwrap(), namespace);
        }
    }

    #[test]
    fn can_reject_unknown_namespace() {
        assert!(matches!(
            "checkout".parse::<Namespace>(),
            Err(I18nError::UnknownNamespace(name)) if name == "checkout"
        ));
    }
}
