//! Localized UI strings and the saved language preference.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::StoreError;
use crate::storage::LocalStore;

pub const LANGUAGE_KEY: &str = "selectedLang";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Punjabi,
    Marathi,
    Bengali,
    Tamil,
    Telugu,
    Gujarati,
}

/// The fixed set of UI strings shown on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiText {
    pub title: &'static str,
    pub welcome: &'static str,
    pub track: &'static str,
    pub upload: &'static str,
    pub resources: &'static str,
    pub contact: &'static str,
    pub email: &'static str,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Hindi,
        Language::Punjabi,
        Language::Marathi,
        Language::Bengali,
        Language::Tamil,
        Language::Telugu,
        Language::Gujarati,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Punjabi => "pa",
            Language::Marathi => "mr",
            Language::Bengali => "bn",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Gujarati => "gu",
        }
    }

    pub fn ui_text(&self) -> UiText {
        match self {
            Language::English => UiText {
                title: "Farm Waste Management",
                welcome: "Helping farmers manage agricultural waste effectively.",
                track: "Waste Tracking System",
                upload: "Upload Photos",
                resources: "Educational Resources",
                contact: "Contact Us",
                email: "Email: support@farmwaste.com",
            },
            Language::Hindi => UiText {
                title: "फार्म कचरा प्रबंधन",
                welcome: "किसानों को कृषि कचरे का प्रभावी ढंग से प्रबंधन करने में मदद करना।",
                track: "कचरा ट्रैकिंग प्रणाली",
                upload: "फोटो अपलोड करें",
                resources: "शैक्षिक संसाधन",
                contact: "संपर्क करें",
                email: "ईमेल: support@farmwaste.com",
            },
            Language::Punjabi => UiText {
                title: "ਖੇਤੀਬਾੜੀ ਕਚਰਾ ਪ੍ਰਬੰਧਨ",
                welcome: "ਕਿਸਾਨਾਂ ਦੀ ਮਦਦ ਕਰਨਾ ਕਿ ਉਹ ਖੇਤੀਬਾੜੀ ਕਚਰੇ ਨੂੰ ਢੰਗ ਨਾਲ ਨਿਬਾ ਸਕਣ।",
                track: "ਕਚਰਾ ਟ੍ਰੈਕਿੰਗ ਸਿਸਟਮ",
                upload: "ਤਸਵੀਰਾਂ ਅੱਪਲੋਡ ਕਰੋ",
                resources: "ਸ਼ਿੱਖਿਆ ਸੰਸਾਧਨ",
                contact: "ਸਾਡੇ ਨਾਲ ਸੰਪਰਕ ਕਰੋ",
                email: "ਈਮੇਲ: support@farmwaste.com",
            },
            Language::Marathi => UiText {
                title: "शेतीतील कचरा व्यवस्थापन",
                welcome: "शेतकऱ्यांना कृषी कचऱ्याचे प्रभावीपणे व्यवस्थापन करण्यास मदत करणे.",
                track: "कचरा ट्रॅकिंग प्रणाली",
                upload: "फोटो अपलोड करा",
                resources: "शैक्षणिक संसाधने",
                contact: "संपर्क करा",
                email: "ईमेल: support@farmwaste.com",
            },
            Language::Bengali => UiText {
                title: "ফার্ম বর্জ্য ব্যবস্থাপনা",
                welcome: "কৃষকদের কৃষি বর্জ্য কার্যকরভাবে পরিচালনা করতে সাহায্য করা।",
                track: "বর্জ্য ট্র্যাকিং সিস্টেম",
                upload: "ছবি আপলোড করুন",
                resources: "শিক্ষাগত সম্পদ",
                contact: "যোগাযোগ করুন",
                email: "ইমেল: support@farmwaste.com",
            },
            Language::Tamil => UiText {
                title: "விவசாயக் கழிவு மேலாண்மை",
                welcome: "விவசாயிகள் விவசாயக் கழிவுகளை திறம்பட நிர்வகிக்க உதவுதல்.",
                track: "கழிவு கண்காணிப்பு அமைப்பு",
                upload: "புகைப்படங்களை பதிவேற்றம் செய்யவும்",
                resources: "கல்வி வளங்கள்",
                contact: "தொடர்பு கொள்ளுங்கள்",
                email: "மின்னஞ்சல்: support@farmwaste.com",
            },
            Language::Telugu => UiText {
                title: "వ్యవసాయ వ్యర్థాల నిర్వహణ",
                welcome: "వ్యవసాయ వ్యర్థాలను సమర్థవంతంగా నిర్వహించడానికి రైతులకు సహాయపడటం.",
                track: "వ్యర్థాల ట్రాకింగ్ వ్యవస్థ",
                upload: "ఫోటోలను అప్‌లోడ్ చేయండి",
                resources: "విద్యా వనరులు",
                contact: "మా‌ను సంప్రదించండి",
                email: "ఇమెయిల్: support@farmwaste.com",
            },
            Language::Gujarati => UiText {
                title: "ખેત વેસ્ટ મેનેજમેન્ટ",
                welcome: "ખેડૂતોએ ખેતી વેસ્ટનું અસરકારક રીતે મેનેજમેન્ટ કરવા માટે સહાય કરવી.",
                track: "વેસ્ટ ટ્રેકિંગ સિસ્ટમ",
                upload: "ફોટા અપલોડ કરો",
                resources: "શૈક્ષણિક સંસાધનો",
                contact: "અમારો સંપર્ક કરો",
                email: "ઈમેલ: support@farmwaste.com",
            },
        }
    }

    /// The saved preference, or English when none (or an unknown code) is stored.
    pub fn load_preference(store: &LocalStore) -> Language {
        match store.get(LANGUAGE_KEY) {
            None => Language::default(),
            Some(code) => code.parse().unwrap_or_else(|e| {
                warn!("ignoring saved language: {}", e);
                Language::default()
            }),
        }
    }

    pub fn save_preference(&self, store: &mut LocalStore) -> Result<(), StoreError> {
        store.set(LANGUAGE_KEY, self.code())
    }
}

impl FromStr for Language {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StoreError::UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for UiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.welcome)?;
        writeln!(f)?;
        writeln!(f, "- {}", self.track)?;
        writeln!(f, "- {}", self.upload)?;
        writeln!(f, "- {}", self.resources)?;
        writeln!(f)?;
        writeln!(f, "{}", self.contact)?;
        write!(f, "{}", self.email)
    }
}
