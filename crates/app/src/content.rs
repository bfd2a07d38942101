//! Static knowledge base and contact content.

use serde::Serialize;

/// One FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    /// Question
    pub question: &'static str,
    /// Answer (may contain line breaks)
    pub answer: &'static str,
}

/// Knowledge base entries.
pub const FAQS: &[Faq] = &[
    Faq {
        question: "What are the benefits of car film?",
        answer: "Car film provides multiple benefits: UV protection, enhanced glass safety, \
                 increased privacy, reduced glare, lower interior temperature, and improved \
                 vehicle appearance.",
    },
    Faq {
        question: "How to maintain car film?",
        answer: "1. Avoid opening windows for 48 hours after installation\n\
                 2. Clean with soft cloth and neutral detergent\n\
                 3. Avoid ammonia-based or abrasive cleaning products\n\
                 4. Schedule regular professional cleaning and inspection",
    },
    Faq {
        question: "How long does car film last?",
        answer: "Quality car film can last 5-10 years with proper maintenance. However, actual \
                 lifespan depends on environmental conditions, maintenance, and film quality.",
    },
];

/// Kind of contact entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactKind {
    /// Phone number
    Phone,
    /// Email address
    Email,
    /// Shop address
    Address,
    /// Opening hours
    Hours,
}

/// One row on the contact screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactEntry {
    /// Kind
    pub kind: ContactKind,
    /// Label
    pub label: &'static str,
    /// Displayed value
    pub value: &'static str,
    /// URI opened when the row is tapped
    pub action: Option<&'static str>,
}

/// Contact details of the shop.
pub const CONTACTS: &[ContactEntry] = &[
    ContactEntry {
        kind: ContactKind::Phone,
        label: "Phone",
        value: "0912-345-678",
        action: Some("tel:0912345678"),
    },
    ContactEntry {
        kind: ContactKind::Email,
        label: "Email",
        value: "info@wraptitude.com",
        action: Some("mailto:info@wraptitude.com"),
    },
    ContactEntry {
        kind: ContactKind::Address,
        label: "Address",
        value: "7 Xinyi Road Section 5, Xinyi District, Taipei",
        action: Some("https://maps.google.com/?q=7 Xinyi Road Section 5, Xinyi District, Taipei"),
    },
    ContactEntry {
        kind: ContactKind::Hours,
        label: "Business Hours",
        value: "Mon-Sat 10:00-19:00",
        action: None,
    },
];

/// Case-insensitive FAQ search over questions and answers.
pub fn search_faqs(query: &str) -> Vec<&'static Faq> {
    let needle = query.trim().to_lowercase();
    FAQS.iter()
        .filter(|f| {
            needle.is_empty()
                || f.question.to_lowercase().contains(&needle)
                || f.answer.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Expand/collapse state where at most one item is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclosure<K> {
    expanded: Option<K>,
}

impl<K> Default for Disclosure<K> {
    fn default() -> Self {
        Self { expanded: None }
    }
}

impl<K: PartialEq> Disclosure<K> {
    /// All collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tap an item: opens it, or closes it if it was open.
    pub fn toggle(&mut self, key: K) {
        if self.expanded.as_ref() == Some(&key) {
            self.expanded = None;
        } else {
            self.expanded = Some(key);
        }
    }

    /// Check if an item is open.
    pub fn is_expanded(&self, key: &K) -> bool {
        self.expanded.as_ref() == Some(key)
    }

    /// The open item.
    pub fn expanded(&self) -> Option<&K> {
        self.expanded.as_ref()
    }
}
