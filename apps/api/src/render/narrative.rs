//! Letter narrative: the single copy of the CARE Index letter text.
//!
//! `compose` turns a recipient into an ordered list of `Block`s. The DOCX and HTML
//! writers both walk these blocks, so the narrative cannot drift between formats:
//! only the address, the greeting and the constituents phrase differ per recipient.

use crate::recipients::models::{normalize_percentage, Recipient};

pub const LETTER_DATE: &str = "4 September 2025";
pub const VALEDICTION: &str = "Yours sincerely,";
pub const SIGNATORY_NAME: &str = "Kate Carnell AO";
pub const SIGNATORY_TITLE: &str = "Chair, Violet";
pub const ATTACHMENT_NOTE: &str =
    "Attachment: Campaign submissions, CARE Index 2025 Executive Summary, Violet briefing note";

/// Opening of bullet 1 when no percentage figure is available.
pub const FALLBACK_PHRASE: &str = "Many of your constituents";

const INTRO_LEAD: &str = "I am writing to brief you on the ";
const INTRO_HIGHLIGHT: &str = "CARE Index 2025";
const INTRO_TAIL: &str = " - critical new research that directly impacts your constituents and presents immediate policy opportunities.";

const CHALLENGE_HEADING: &str = "The Challenge";
const CHALLENGE_TEXT: &str = "The CARE Index 2025 (Caregiving and Ageing Readiness Evaluation) is Australia's first comprehensive assessment of our national preparedness for a rapidly ageing population. This landmark study commissioned by Violet reveals a critical finding: Australia scored just 23.1 out of 100 across five key pressure points - preparedness, planning, emotional toll, relationship strain, and competing demands. We are dangerously underprepared for what lies ahead.";

const MATTERS_HEADING: &str = "Why This Matters";
const MATTERS_TEXT: &str =
    "This result directly impacts your constituents and presents immediate policy opportunities.";

const SANDWICH_TAIL: &str = " are \"Sandwich Generation\" voters managing competing care responsibilities for elderly parents and their own children while attempting to remain in the workforce.";

/// Bullets 2–5: (full text, emphasised prefix, optional follow-on note).
const FIXED_BULLETS: [(&str, &str, Option<&str>); 4] = [
    (
        "88% feel unprepared and overwhelmed by current or anticipated caregiving demands.",
        "88% feel unprepared and overwhelmed",
        Some("Submissions from your constituents have been provided in this package."),
    ),
    (
        "Almost 60% of Australians are already caring or will be within a decade, with two-thirds being women who face a 42% lifetime earnings gap while performing the equivalent of a 31.7 hour unpaid second job.",
        "Almost 60% of Australians are already caring or will be within a decade,",
        None,
    ),
    (
        "$6+ billion annual economic impact from inappropriate care settings, preventable hospitalisations and low-value care due to inadequate planning, guidance and family support.",
        "$6+ billion annual economic impact",
        None,
    ),
    (
        "Mental health crisis among family caregivers is creating workplace absence, relationship breakdown, and financial hardship, affecting hundreds of thousands of voters.",
        "Mental health crisis among family caregivers",
        None,
    ),
];

const ACT_HEADING: &str = "Why Act Now";
const ACT_TEXT: &str = "Australia will experience a 400% increase in people reaching 85 years by 2031. We have proven solutions ready for immediate implementation through existing infrastructure like the Carer Gateway (over $1 billion invested) and Violet's technology-enabled platform already serving 30,000+ Australians.";

const OPPORTUNITY_HEADING: &str = "The Opportunity";
const OPPORTUNITY_TEXT: &str = "This research provides you with media-ready solutions for high-priority constituent concerns, evidence-based policy frameworks, and the first comprehensive national data on Australia's fastest-growing voter issue.";

const CLOSING_TEXT: &str = "I would welcome the opportunity to brief you further on how the CARE Index findings can support your advocacy for constituents facing these challenges.";

// ────────────────────────────────────────────────────────────────────────────
// Letter structure
// ────────────────────────────────────────────────────────────────────────────

/// A styled span of text. `\n` inside `text` is a line break in both formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }
}

/// One evidence bullet with its designated emphasis prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceBullet {
    pub text: String,
    pub emphasis: String,
    /// Italic line shown under the bullet text.
    pub note: Option<&'static str>,
}

impl EvidenceBullet {
    /// Splits the bullet into an emphasised lead and the remainder.
    ///
    /// The prefix must match the start of `text` exactly; otherwise the whole bullet
    /// is a single plain run (never a partial emphasis).
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = match self.text.strip_prefix(self.emphasis.as_str()) {
            Some(rest) if !self.emphasis.is_empty() => {
                let mut runs = vec![Run::bold(self.emphasis.as_str())];
                if !rest.is_empty() {
                    runs.push(Run::plain(rest));
                }
                runs
            }
            _ => vec![Run::plain(self.text.as_str())],
        };
        if let Some(note) = self.note {
            runs.push(Run::plain("\n"));
            runs.push(Run::italic(note));
        }
        runs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Date(&'static str),
    /// The recipient's full salutation block, verbatim.
    Address(String),
    /// The recipient's greeting line, emphasised.
    Greeting(String),
    Heading(&'static str),
    Paragraph(Vec<Run>),
    Evidence(Vec<EvidenceBullet>),
    SignOff {
        valediction: &'static str,
        name: &'static str,
        title: &'static str,
    },
    Attachment(&'static str),
}

/// A fully composed letter for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    /// `"<first> <last>"`, used for the HTML page title.
    pub addressee: String,
    pub blocks: Vec<Block>,
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Opening phrase of bullet 1.
///
/// `"<value> of your constituents"` when a percentage is present, otherwise
/// `FALLBACK_PHRASE`. Blank cells and missing-value markers count as absent.
pub fn constituents_phrase(percentage: Option<&str>) -> String {
    match percentage.and_then(normalize_percentage) {
        Some(value) => format!("{value} of your constituents"),
        None => FALLBACK_PHRASE.to_string(),
    }
}

/// The five evidence bullets, the first led by the conditional phrase.
pub fn evidence_bullets(phrase: &str) -> Vec<EvidenceBullet> {
    let mut bullets = vec![EvidenceBullet {
        text: format!("{phrase}{SANDWICH_TAIL}"),
        emphasis: phrase.to_string(),
        note: None,
    }];
    bullets.extend(
        FIXED_BULLETS
            .iter()
            .map(|(text, emphasis, note)| EvidenceBullet {
                text: text.to_string(),
                emphasis: emphasis.to_string(),
                note: *note,
            }),
    );
    bullets
}

/// Builds the letter for one recipient. Deterministic: no clock or random input.
pub fn compose(recipient: &Recipient) -> Letter {
    let phrase = constituents_phrase(recipient.percentage_electorate.as_deref());

    let blocks = vec![
        Block::Date(LETTER_DATE),
        Block::Address(recipient.full_salutation.clone()),
        Block::Greeting(recipient.salutation.clone()),
        Block::Paragraph(vec![
            Run::plain(INTRO_LEAD),
            Run::bold(INTRO_HIGHLIGHT),
            Run::plain(INTRO_TAIL),
        ]),
        Block::Heading(CHALLENGE_HEADING),
        Block::Paragraph(vec![Run::plain(CHALLENGE_TEXT)]),
        Block::Heading(MATTERS_HEADING),
        Block::Paragraph(vec![Run::plain(MATTERS_TEXT)]),
        Block::Evidence(evidence_bullets(&phrase)),
        Block::Heading(ACT_HEADING),
        Block::Paragraph(vec![Run::plain(ACT_TEXT)]),
        Block::Heading(OPPORTUNITY_HEADING),
        Block::Paragraph(vec![Run::plain(OPPORTUNITY_TEXT)]),
        Block::Paragraph(vec![Run::plain(CLOSING_TEXT)]),
        Block::SignOff {
            valediction: VALEDICTION,
            name: SIGNATORY_NAME,
            title: SIGNATORY_TITLE,
        },
        Block::Attachment(ATTACHMENT_NOTE),
    ];

    Letter {
        addressee: recipient.display_name(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(percentage: Option<&str>) -> Recipient {
        Recipient {
            full_salutation: "Ms Jodie Belyea MP\nMember for Dunkley".to_string(),
            salutation: "Dear Ms Belyea".to_string(),
            first_name: "Jodie".to_string(),
            last_name: "Belyea".to_string(),
            electorate: "Dunkley".to_string(),
            percentage_electorate: percentage.map(str::to_string),
        }
    }

    fn first_bullet(letter: &Letter) -> &EvidenceBullet {
        letter
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Evidence(bullets) => bullets.first(),
                _ => None,
            })
            .expect("letter has evidence bullets")
    }

    #[test]
    fn test_phrase_with_percentage() {
        assert_eq!(
            constituents_phrase(Some("26.18%")),
            "26.18% of your constituents"
        );
    }

    #[test]
    fn test_phrase_without_percentage() {
        assert_eq!(constituents_phrase(None), FALLBACK_PHRASE);
        assert_eq!(constituents_phrase(Some("")), FALLBACK_PHRASE);
        assert_eq!(constituents_phrase(Some("  ")), FALLBACK_PHRASE);
        assert_eq!(constituents_phrase(Some("nan")), FALLBACK_PHRASE);
    }

    #[test]
    fn test_first_bullet_emphasises_phrase() {
        let letter = compose(&recipient(Some("26.18%")));
        let runs = first_bullet(&letter).runs();
        assert_eq!(runs[0], Run::bold("26.18% of your constituents"));
        assert!(runs[1].text.starts_with(" are \"Sandwich Generation\" voters"));
        assert!(!runs[1].bold);
    }

    #[test]
    fn test_first_bullet_fallback_phrase() {
        let letter = compose(&recipient(None));
        let runs = first_bullet(&letter).runs();
        assert_eq!(runs[0], Run::bold("Many of your constituents"));
    }

    #[test]
    fn test_every_fixed_bullet_gets_its_emphasis() {
        for bullet in evidence_bullets(FALLBACK_PHRASE) {
            let runs = bullet.runs();
            assert!(runs[0].bold, "bullet not emphasised: {}", bullet.text);
            assert_eq!(runs[0].text, bullet.emphasis);
        }
    }

    #[test]
    fn test_mismatched_prefix_renders_plain() {
        let bullet = EvidenceBullet {
            text: "Nearly 90% feel unprepared".to_string(),
            emphasis: "88% feel unprepared".to_string(),
            note: None,
        };
        assert_eq!(bullet.runs(), vec![Run::plain("Nearly 90% feel unprepared")]);
    }

    #[test]
    fn test_empty_prefix_renders_plain() {
        let bullet = EvidenceBullet {
            text: "Some text".to_string(),
            emphasis: String::new(),
            note: None,
        };
        assert_eq!(bullet.runs(), vec![Run::plain("Some text")]);
    }

    #[test]
    fn test_note_follows_line_break_in_italic() {
        let bullets = evidence_bullets(FALLBACK_PHRASE);
        let runs = bullets[1].runs();
        let n = runs.len();
        assert_eq!(runs[n - 2], Run::plain("\n"));
        assert!(runs[n - 1].italic);
        assert!(runs[n - 1].text.starts_with("Submissions from your constituents"));
    }

    #[test]
    fn test_five_evidence_bullets() {
        assert_eq!(evidence_bullets(FALLBACK_PHRASE).len(), 5);
    }

    #[test]
    fn test_address_and_greeting_are_verbatim() {
        let r = recipient(None);
        let letter = compose(&r);
        assert!(letter.blocks.contains(&Block::Address(r.full_salutation.clone())));
        assert!(letter.blocks.contains(&Block::Greeting(r.salutation.clone())));
        assert_eq!(letter.addressee, "Jodie Belyea");
    }

    #[test]
    fn test_fixed_sections_identical_across_recipients() {
        let a = compose(&recipient(Some("26.18%")));
        let mut other = recipient(None);
        other.full_salutation = "Senator Leah Blyth\nSenator for South Australia".to_string();
        other.salutation = "Dear Senator Blyth".to_string();
        let b = compose(&other);

        assert_eq!(a.blocks.len(), b.blocks.len());
        for (x, y) in a.blocks.iter().zip(&b.blocks) {
            match (x, y) {
                (Block::Address(_), Block::Address(_))
                | (Block::Greeting(_), Block::Greeting(_)) => {}
                (Block::Evidence(xs), Block::Evidence(ys)) => assert_eq!(xs[1..], ys[1..]),
                _ => assert_eq!(x, y),
            }
        }
    }

    #[test]
    fn test_compose_is_deterministic() {
        let r = recipient(Some("12%"));
        assert_eq!(compose(&r), compose(&r));
    }
}
