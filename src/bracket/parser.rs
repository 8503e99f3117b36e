//! Game-name parsing.
//!
//! Organizers have labelled games by hand for years, with little agreement on
//! spelling: "R1 A1", "SF A 1", "Tier 2 G14", "QF1", "FF". Each tournament
//! format owns an ordered rule list; the highest-priority rule whose pattern
//! matches the trimmed, case-folded name decides the section, the short label
//! shown inside the bracket, and the sort order. Names no rule understands land
//! in the `unknown` section at [`UNKNOWN_SORT_ORDER`].
//!
//! Sort orders are banded so sections never interleave:
//!
//! | section | key | base |
//! |---|---|---|
//! | Round r | `round-{r}` | `min(r, 49) * 100` |
//! | PreQuarters | `pre-quarters` | 5000 |
//! | Quarterfinals | `quarterfinals` | 5500 |
//! | Elimination | `elimination` | 6000 |
//! | Semifinals Play-In | `semifinals-play-in` | 6500 |
//! | Semifinals | `semifinals` | 7000 |
//! | Finals Play-In | `finals-play-in` | 7500 |
//! | Finals | `finals` | 8000 |
//! | Tier n (league) | `tier-{n}` | `n * 1000` |
//! | Games (head-to-head) | `games` | 0 |
//! | Unknown | `unknown` | 9999 |
//!
//! These keys and bands are what the bracket renderer orders by; changing them
//! reorders historical brackets.

use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::TournamentFormat;

/// Section key for names no rule recognises.
pub const UNKNOWN_SECTION_KEY: &str = "unknown";

/// Sort order for names no rule recognises.
pub const UNKNOWN_SORT_ORDER: u32 = 9999;

const ROUND_BAND: u32 = 100;
const MAX_BANDED_ROUND: u32 = 49;
const STAGE_BAND: u32 = 500;
const TIER_BAND: u32 = 1000;

// Inside an elimination band: bare game numbers take 0..100, lettered games follow.
const LETTERED_OFFSET: u32 = 100;
const LETTER_STRIDE: u32 = 15;

/// Elimination-stage vocabulary.
const STAGE_WORDS: &str = r"PQ|PRE[\s-]?QUARTER(?:\s*FINAL)?S?|QF|QE|QUARTER(?:\s*FINAL)?S?|ELIM(?:INATION)?|SF|SE|SEMI(?:\s*FINAL)?S?|FF|F|FINALS?";

/// Structured reading of one game label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedGame {
    /// Stable grouping id ("round-2", "semifinals", "tier-1")
    pub section_key: String,

    /// Human label for the section ("Round 2", "Semifinals")
    pub section_label: String,

    /// Short label inside the section ("A1", "Game 2", "G14")
    pub display_name: String,

    pub sort_order: u32,
}

impl ParsedGame {
    /// Pass-through result for a name no rule recognises.
    pub fn unknown(display_name: &str) -> Self {
        Self {
            section_key: UNKNOWN_SECTION_KEY.to_string(),
            section_label: "Unknown".to_string(),
            display_name: display_name.to_string(),
            sort_order: UNKNOWN_SORT_ORDER,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.section_key == UNKNOWN_SECTION_KEY
    }

    /// Elimination stage of this game, if any.
    pub fn stage(&self) -> Option<Stage> {
        Stage::from_section_key(&self.section_key)
    }

    fn round(round: u32, sub: u32, display_name: String) -> Self {
        Self {
            section_key: format!("round-{round}"),
            section_label: format!("Round {round}"),
            display_name,
            sort_order: round.min(MAX_BANDED_ROUND) * ROUND_BAND + sub.min(ROUND_BAND - 1),
        }
    }

    fn tier(tier: u32, game: u32, display_name: String) -> Self {
        Self {
            section_key: format!("tier-{tier}"),
            section_label: format!("Tier {tier}"),
            display_name,
            sort_order: tier.saturating_mul(TIER_BAND).saturating_add(game),
        }
    }
}

/// Single-elimination stages of a standard bracket, in bracket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    PreQuarters,
    Quarterfinals,
    Elimination,
    SemifinalsPlayIn,
    Semifinals,
    FinalsPlayIn,
    Finals,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::PreQuarters,
        Stage::Quarterfinals,
        Stage::Elimination,
        Stage::SemifinalsPlayIn,
        Stage::Semifinals,
        Stage::FinalsPlayIn,
        Stage::Finals,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Stage::PreQuarters => "pre-quarters",
            Stage::Quarterfinals => "quarterfinals",
            Stage::Elimination => "elimination",
            Stage::SemifinalsPlayIn => "semifinals-play-in",
            Stage::Semifinals => "semifinals",
            Stage::FinalsPlayIn => "finals-play-in",
            Stage::Finals => "finals",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::PreQuarters => "PreQuarters",
            Stage::Quarterfinals => "Quarterfinals",
            Stage::Elimination => "Elimination",
            Stage::SemifinalsPlayIn => "Semifinals Play-In",
            Stage::Semifinals => "Semifinals",
            Stage::FinalsPlayIn => "Finals Play-In",
            Stage::Finals => "Finals",
        }
    }

    /// First sort order of the stage's band.
    pub fn base(self) -> u32 {
        match self {
            Stage::PreQuarters => 5000,
            Stage::Quarterfinals => 5500,
            Stage::Elimination => 6000,
            Stage::SemifinalsPlayIn => 6500,
            Stage::Semifinals => 7000,
            Stage::FinalsPlayIn => 7500,
            Stage::Finals => 8000,
        }
    }

    pub fn from_section_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.key() == key)
    }

    /// Map a matched stage word ("qf", "Semi Finals", "Pre-Quarter") to its stage.
    fn from_word(word: &str) -> Option<Self> {
        let word: String = word
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_uppercase();

        if word == "PQ" || word.starts_with("PRE") {
            Some(Stage::PreQuarters)
        } else if word == "QF" || word == "QE" || word.starts_with("QUARTER") {
            Some(Stage::Quarterfinals)
        } else if word.starts_with("ELIM") {
            Some(Stage::Elimination)
        } else if word == "SF" || word == "SE" || word.starts_with("SEMI") {
            Some(Stage::Semifinals)
        } else if word == "FF" || word == "F" || word.starts_with("FINAL") {
            Some(Stage::Finals)
        } else {
            None
        }
    }

    fn section(self, sub: u32, display_name: String) -> ParsedGame {
        ParsedGame {
            section_key: self.key().to_string(),
            section_label: self.label().to_string(),
            display_name,
            sort_order: self.base() + sub.min(STAGE_BAND - 1),
        }
    }

    fn game(self, number: u32) -> ParsedGame {
        self.section(number.min(LETTERED_OFFSET - 1), format!("Game {number}"))
    }

    fn lettered(self, letter: char, number: u32, display_name: String) -> ParsedGame {
        let sub = LETTERED_OFFSET
            + letter_index(letter).min(25) * LETTER_STRIDE
            + number.min(LETTER_STRIDE - 1);
        self.section(sub, display_name)
    }
}

type Handler = fn(&Captures<'_>, &str) -> Option<ParsedGame>;

/// One entry of a format's cascade.
struct Rule {
    priority: u8,
    pattern: Regex,
    handler: Handler,
}

impl Rule {
    fn new(priority: u8, pattern: &str, handler: Handler) -> Self {
        let pattern = Regex::new(&format!(r"(?i)^(?:{pattern})$"))
            .expect("game-name pattern must compile");
        Self {
            priority,
            pattern,
            handler,
        }
    }
}

fn cascade(mut rules: Vec<Rule>) -> Vec<Rule> {
    rules.sort_by_key(|rule| Reverse(rule.priority));
    rules
}

static STANDARD_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    cascade(vec![
        Rule::new(
            100,
            r"(?:SF|SE|SEMI(?:\s*FINAL)?S?)\s*PLAY[\s-]*IN\s*(\d+)?",
            |caps, _| Some(Stage::SemifinalsPlayIn.game(number_or(caps, 1, 1)?)),
        ),
        Rule::new(99, r"(?:FF|F|FINALS?)\s*PLAY[\s-]*IN\s*(\d+)?", |caps, _| {
            Some(Stage::FinalsPlayIn.game(number_or(caps, 1, 1)?))
        }),
        Rule::new(98, r"PLAY[\s-]*IN\s*(\d+)?", |caps, _| {
            Some(Stage::FinalsPlayIn.game(number_or(caps, 1, 1)?))
        }),
        Rule::new(91, r"PLAY[\s-]*IN\s+([A-Z])\s*G\s*(\d+)", |caps, _| {
            let (letter, game) = (letter(caps, 1)?, number(caps, 2)?);
            Some(Stage::FinalsPlayIn.lettered(letter, game, format!("{letter} G{game}")))
        }),
        Rule::new(
            90,
            &format!(r"({STAGE_WORDS})\s+([A-Z])\s*G\s*(\d+)"),
            stage_letter_game,
        ),
        Rule::new(85, r"([A-Z])(\d+)\s+G\s*(\d+)", group_round_game),
        Rule::new(
            80,
            &format!(r"({STAGE_WORDS})\s+([A-Z])\s*(\d+)?"),
            stage_letter,
        ),
        Rule::new(75, &format!(r"({STAGE_WORDS})\s*(\d+)?"), stage_number),
        Rule::new(
            70,
            r"ELIM(?:INATION)?\s+(\d+)\s*([A-Z])",
            elimination_number_letter,
        ),
        Rule::new(60, r"R(?:OUND)?\s*(\d+)\s+([A-Z])\s*(\d+)", |caps, _| {
            let (round, letter, game) = (number(caps, 1)?, letter(caps, 2)?, number(caps, 3)?);
            Some(ParsedGame::round(
                round,
                round_sub(letter, game),
                format!("{letter}{game}"),
            ))
        }),
        Rule::new(59, r"R(?:OUND)?\s*(\d+)\s+([A-Z])", |caps, _| {
            let (round, letter) = (number(caps, 1)?, letter(caps, 2)?);
            Some(ParsedGame::round(round, round_sub(letter, 0), letter.to_string()))
        }),
        Rule::new(58, r"R(?:OUND)?\s*(\d+)", |caps, _| {
            let round = number(caps, 1)?;
            Some(ParsedGame::round(round, 0, format!("R{round}")))
        }),
        Rule::new(50, r"(?:GROUP\s*)?([A-Z])(\d+)", |caps, _| {
            let (letter, round) = (letter(caps, 1)?, number(caps, 2)?);
            Some(ParsedGame::round(
                round,
                round_sub(letter, 0),
                format!("{letter}{round}"),
            ))
        }),
    ])
});

static LEAGUE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    cascade(vec![
        Rule::new(100, r"TIER\s*(\d+)\s*G\s*(\d+)", tier_game),
        Rule::new(99, r"T([123])\s*G\s*(\d+)", tier_game),
        Rule::new(98, r"TIER\s*(\d+)|T([123])", |caps, name| {
            let tier = caps.get(1).or_else(|| caps.get(2))?.as_str().parse().ok()?;
            Some(ParsedGame::tier(tier, 0, name.to_string()))
        }),
    ])
});

static HEAD_TO_HEAD_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    cascade(vec![Rule::new(100, r"G(?:AME)?\s*(\d+)", |caps, _| {
        let game = number(caps, 1)?;
        Some(ParsedGame {
            section_key: "games".to_string(),
            section_label: "Games".to_string(),
            display_name: format!("G{game}"),
            sort_order: game,
        })
    })])
});

fn rules_for(format: TournamentFormat) -> &'static [Rule] {
    match format {
        TournamentFormat::Standard => STANDARD_RULES.as_slice(),
        TournamentFormat::League => LEAGUE_RULES.as_slice(),
        TournamentFormat::HeadToHead => HEAD_TO_HEAD_RULES.as_slice(),
    }
}

/// Classify a raw game name under the event's format.
///
/// Total: a missing, empty or unrecognised name yields [`ParsedGame::unknown`]
/// carrying the trimmed name.
pub fn parse_game_name(name: Option<&str>, format: TournamentFormat) -> ParsedGame {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return ParsedGame::unknown("");
    };

    rules_for(format)
        .iter()
        .find_map(|rule| {
            let caps = rule.pattern.captures(name)?;
            (rule.handler)(&caps, name)
        })
        .unwrap_or_else(|| ParsedGame::unknown(name))
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// Optional numeric group; `None` only when present but out of range.
fn number_or(caps: &Captures<'_>, group: usize, default: u32) -> Option<u32> {
    match caps.get(group) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(default),
    }
}

fn letter(caps: &Captures<'_>, group: usize) -> Option<char> {
    caps.get(group)?
        .as_str()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
}

fn letter_index(letter: char) -> u32 {
    (letter as u32).saturating_sub('A' as u32)
}

/// Position inside a round band. Monotone in (letter, game) but saturates at
/// the top of the band, so labels past "J9" share an order and the grouper
/// breaks the tie on display name.
fn round_sub(letter: char, game: u32) -> u32 {
    letter_index(letter)
        .saturating_mul(10)
        .saturating_add(game.min(9))
        .min(ROUND_BAND - 1)
}

// "Semi A G1"
fn stage_letter_game(caps: &Captures<'_>, _: &str) -> Option<ParsedGame> {
    let stage = Stage::from_word(caps.get(1)?.as_str())?;
    let (letter, game) = (letter(caps, 2)?, number(caps, 3)?);
    Some(stage.lettered(letter, game, format!("{letter} G{game}")))
}

// "A1 G2": group A, round 1, game 2
fn group_round_game(caps: &Captures<'_>, _: &str) -> Option<ParsedGame> {
    let (letter, round, game) = (letter(caps, 1)?, number(caps, 2)?, number(caps, 3)?);
    Some(ParsedGame::round(
        round,
        round_sub(letter, game),
        format!("{letter} G{game}"),
    ))
}

// "SF A 1", "Final B"
fn stage_letter(caps: &Captures<'_>, _: &str) -> Option<ParsedGame> {
    let stage = Stage::from_word(caps.get(1)?.as_str())?;
    let letter = letter(caps, 2)?;
    let game = match caps.get(3) {
        Some(m) => Some(m.as_str().parse::<u32>().ok()?),
        None => None,
    };
    let display_name = match game {
        Some(game) => format!("{letter}{game}"),
        None => letter.to_string(),
    };
    Some(stage.lettered(letter, game.unwrap_or(0), display_name))
}

// "QF1", "SF 2", "FF", "Finals 3"
fn stage_number(caps: &Captures<'_>, _: &str) -> Option<ParsedGame> {
    let stage = Stage::from_word(caps.get(1)?.as_str())?;
    Some(stage.game(number_or(caps, 2, 1)?))
}

// "Elimination 1a"
fn elimination_number_letter(caps: &Captures<'_>, _: &str) -> Option<ParsedGame> {
    let (game, letter) = (number(caps, 1)?, letter(caps, 2)?);
    Some(Stage::Elimination.lettered(letter, game, format!("{game}{letter}")))
}

fn tier_game(caps: &Captures<'_>, _: &str) -> Option<ParsedGame> {
    let (tier, game) = (number(caps, 1)?, number(caps, 2)?);
    Some(ParsedGame::tier(tier, game, format!("G{game}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn standard(name: &str) -> ParsedGame {
        parse_game_name(Some(name), TournamentFormat::Standard)
    }

    fn summary(parsed: &ParsedGame) -> (&str, &str, &str, u32) {
        (
            parsed.section_key.as_str(),
            parsed.section_label.as_str(),
            parsed.display_name.as_str(),
            parsed.sort_order,
        )
    }

    #[test]
    fn test_round_group_game() {
        assert_eq!(summary(&standard("R1 A1")), ("round-1", "Round 1", "A1", 101));
        assert_eq!(summary(&standard("r2 b3")), ("round-2", "Round 2", "B3", 213));
        assert_eq!(summary(&standard("Round 3 C1")), ("round-3", "Round 3", "C1", 321));
    }

    #[test]
    fn test_round_group_and_bare_round() {
        assert_eq!(summary(&standard("R4 B")), ("round-4", "Round 4", "B", 410));
        assert_eq!(summary(&standard("R5")), ("round-5", "Round 5", "R5", 500));
    }

    #[test]
    fn test_bare_group_round() {
        assert_eq!(summary(&standard("A1")), ("round-1", "Round 1", "A1", 100));
        assert_eq!(summary(&standard("b2")), ("round-2", "Round 2", "B2", 210));
        assert_eq!(summary(&standard("Group C3")), ("round-3", "Round 3", "C3", 320));
    }

    #[test]
    fn test_group_round_game() {
        assert_eq!(summary(&standard("A1 G2")), ("round-1", "Round 1", "A G2", 102));
    }

    #[test]
    fn test_quarterfinal_spellings() {
        for name in ["QF 1", "QF1", "qf", "Quarterfinal", "Quarter Finals 1", "QE1"] {
            let parsed = standard(name);
            assert_eq!(parsed.section_key, "quarterfinals", "{name}");
            assert_eq!(parsed.display_name, "Game 1", "{name}");
            assert_eq!(parsed.sort_order, 5501, "{name}");
        }
    }

    #[test]
    fn test_semifinal_group_letter_forms() {
        assert_eq!(
            summary(&standard("SF A 1")),
            ("semifinals", "Semifinals", "A1", 7101)
        );
        assert_eq!(summary(&standard("Semi B2")), ("semifinals", "Semifinals", "B2", 7117));
        assert_eq!(summary(&standard("Semi A G1")), ("semifinals", "Semifinals", "A G1", 7101));
    }

    #[test]
    fn test_play_in_stages() {
        assert_eq!(
            summary(&standard("SF PLAYIN 2")),
            ("semifinals-play-in", "Semifinals Play-In", "Game 2", 6502)
        );
        assert_eq!(
            summary(&standard("FF Play-In 1")),
            ("finals-play-in", "Finals Play-In", "Game 1", 7501)
        );
        assert_eq!(standard("Play In").section_key, "finals-play-in");
    }

    #[test]
    fn test_play_in_group_games() {
        assert_eq!(
            summary(&standard("Play-In A G1")),
            ("finals-play-in", "Finals Play-In", "A G1", 7601)
        );
        assert_eq!(
            summary(&standard("playin b g2")),
            ("finals-play-in", "Finals Play-In", "B G2", 7617)
        );
        assert!(standard("Play-In A G1").sort_order < standard("Play-In B G1").sort_order);
    }

    #[test]
    fn test_finals_spellings() {
        for name in ["FF", "F", "Final", "Finals", "FF1", "ff 1"] {
            let parsed = standard(name);
            assert_eq!(parsed.section_key, "finals", "{name}");
            assert_eq!(parsed.display_name, "Game 1", "{name}");
        }
        assert_eq!(standard("Finals 2").sort_order, 8002);
        assert_eq!(summary(&standard("Final B")), ("finals", "Finals", "B", 8115));
    }

    #[test]
    fn test_pre_quarters_and_elimination() {
        assert_eq!(standard("PQ 3").section_key, "pre-quarters");
        assert_eq!(standard("Pre-Quarter A").display_name, "A");
        assert_eq!(summary(&standard("ELIM 2")), ("elimination", "Elimination", "Game 2", 6002));
        assert_eq!(summary(&standard("Elim B")), ("elimination", "Elimination", "B", 6115));
        assert_eq!(
            summary(&standard("Elimination 1a")),
            ("elimination", "Elimination", "1A", 6101)
        );
    }

    #[test]
    fn test_stage_bands_are_ordered() {
        let bases: Vec<u32> = Stage::ALL.iter().map(|s| s.base()).collect();
        let mut sorted = bases.clone();
        sorted.sort_unstable();
        assert_eq!(bases, sorted);
        assert!(Stage::PreQuarters.base() > ParsedGame::round(999, 99, String::new()).sort_order);
        assert!(Stage::Finals.base() + STAGE_BAND <= UNKNOWN_SORT_ORDER);
    }

    #[test]
    fn test_round_order_follows_letters_past_j() {
        assert_eq!(standard("R1 J2").sort_order, 192);
        assert_eq!(standard("R1 K1").sort_order, 199);
        assert!(standard("R1 J9").sort_order < standard("R1 K1").sort_order);
        assert!(standard("R1 A9").sort_order < standard("R1 B1").sort_order);
        // Saturated labels tie and are separated by display name
        assert_eq!(standard("R1 T9").sort_order, standard("R1 T10").sort_order);
        assert!(standard("R1 Z99").sort_order < standard("R2 A1").sort_order);
    }

    #[test]
    fn test_elimination_always_after_rounds() {
        let latest_round = standard("R120 Z9");
        assert_eq!(latest_round.section_key, "round-120");
        for name in ["PQ", "QF 1", "ELIM A", "SF PLAYIN 1", "SF 1", "FF PLAYIN 1", "FF"] {
            assert!(standard(name).sort_order > latest_round.sort_order, "{name}");
        }
    }

    #[test]
    fn test_league_tiers() {
        let parsed = parse_game_name(Some("Tier 2 G14"), TournamentFormat::League);
        assert_eq!(summary(&parsed), ("tier-2", "Tier 2", "G14", 2014));

        let short = parse_game_name(Some("t3 g1"), TournamentFormat::League);
        assert_eq!(summary(&short), ("tier-3", "Tier 3", "G1", 3001));

        let bare = parse_game_name(Some("T1"), TournamentFormat::League);
        assert_eq!(summary(&bare), ("tier-1", "Tier 1", "T1", 1000));
    }

    #[test]
    fn test_league_tiers_never_interleave() {
        let last_of_tier_one = parse_game_name(Some("Tier 1 G999"), TournamentFormat::League);
        let first_of_tier_two = parse_game_name(Some("Tier 2 G1"), TournamentFormat::League);
        assert!(last_of_tier_one.sort_order < first_of_tier_two.sort_order);
    }

    #[test]
    fn test_league_ignores_bracket_names() {
        assert!(parse_game_name(Some("R1 A1"), TournamentFormat::League).is_unknown());
        assert!(parse_game_name(Some("T4 G1"), TournamentFormat::League).is_unknown());
    }

    #[test]
    fn test_head_to_head_games() {
        let parsed = parse_game_name(Some("G7"), TournamentFormat::HeadToHead);
        assert_eq!(summary(&parsed), ("games", "Games", "G7", 7));
        let spelled = parse_game_name(Some("Game 12"), TournamentFormat::HeadToHead);
        assert_eq!(spelled.display_name, "G12");
        assert!(parse_game_name(Some("FF"), TournamentFormat::HeadToHead).is_unknown());
    }

    #[test]
    fn test_unknown_fallback_keeps_trimmed_name() {
        let parsed = standard("  Bonus round!  ");
        assert_eq!(summary(&parsed), ("unknown", "Unknown", "Bonus round!", 9999));
    }

    #[test]
    fn test_missing_and_empty_names() {
        assert_eq!(parse_game_name(None, TournamentFormat::Standard), ParsedGame::unknown(""));
        assert_eq!(standard("   "), ParsedGame::unknown(""));
    }

    #[test]
    fn test_oversized_numbers_fall_back_to_unknown() {
        let parsed = standard("R99999999999 A1");
        assert!(parsed.is_unknown());
        assert_eq!(parsed.display_name, "R99999999999 A1");
    }

    #[test]
    fn test_parsing_is_repeatable() {
        for name in ["R1 A1", "SF A 1", "QF1", "FF", "nonsense"] {
            assert_eq!(standard(name), standard(name));
        }
    }

    #[test]
    fn test_stage_lookup_by_section_key() {
        assert_eq!(standard("SF 1").stage(), Some(Stage::Semifinals));
        assert_eq!(standard("R1 A1").stage(), None);
        assert_eq!(standard("Play-In A G1").stage(), Some(Stage::FinalsPlayIn));
        assert_eq!(Stage::from_section_key("finals-play-in"), Some(Stage::FinalsPlayIn));
    }
}
