//! # Action Descriptors
//!
//! Structured descriptions of the moves a player can make, with two
//! renderings: the full sentence shown in the action log and the short
//! label shown on search-tree edges. Unknown action shapes fall back to a
//! generic string rather than failing.

use std::fmt;

use crate::snapshot::TrainColor;

/// Source of a single drawn train card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardDraw {
    /// Blind draw from the deck.
    Deck,
    /// A face-up card of the given color.
    FaceUp(TrainColor),
}

/// A move made by a player, as reported alongside a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ClaimRoute {
        player: String,
        from: String,
        to: String,
        color: TrainColor,
    },
    DrawTrainCards {
        player: String,
        first: CardDraw,
        /// Absent when the turn ended after one card (face-up wild).
        second: Option<CardDraw>,
    },
    DrawDestinations {
        player: String,
        /// How many of each offered ticket slot was kept.
        kept: [u32; 3],
    },
    /// Catch-all for action shapes the viewer does not understand.
    Other { player: String, description: String },
}

impl Action {
    pub fn player(&self) -> &str {
        match self {
            Action::ClaimRoute { player, .. }
            | Action::DrawTrainCards { player, .. }
            | Action::DrawDestinations { player, .. }
            | Action::Other { player, .. } => player,
        }
    }

    /// Short label for a search-tree edge.
    pub fn edge_label(&self) -> String {
        match self {
            Action::ClaimRoute { from, to, .. } => format!("Claim {from}-{to}"),
            Action::DrawTrainCards { .. } => "Draw Cards".to_string(),
            Action::DrawDestinations { kept, .. } => {
                format!("Draw Dest {}", kept.iter().sum::<u32>())
            }
            Action::Other { description, .. } => description.clone(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ClaimRoute {
                player,
                from,
                to,
                color,
            } => write!(f, "{player} claimed route: {from} to {to} with {color} cards"),
            Action::DrawTrainCards {
                player,
                first,
                second,
            } => format_card_draw(f, player, *first, *second),
            Action::DrawDestinations { player, kept } => {
                let n: u32 = kept.iter().sum();
                write!(f, "{player} drew destination tickets and kept {n}")
            }
            Action::Other {
                player,
                description,
            } => write!(f, "{player}: {description}"),
        }
    }
}

fn format_card_draw(
    f: &mut fmt::Formatter<'_>,
    player: &str,
    first: CardDraw,
    second: Option<CardDraw>,
) -> fmt::Result {
    // A face-up wild ends the turn after a single card.
    if first == CardDraw::FaceUp(TrainColor::Wild) {
        return write!(f, "{player} drew 1 wild");
    }
    match (first, second) {
        (CardDraw::Deck, Some(CardDraw::Deck)) => {
            write!(f, "{player} drew 2 cards from deck")
        }
        (CardDraw::Deck, Some(CardDraw::FaceUp(c))) => {
            write!(f, "{player} drew 1 card from deck and 1 {c} card")
        }
        (CardDraw::FaceUp(c), Some(CardDraw::Deck)) => {
            write!(f, "{player} drew 1 {c} card and 1 card from deck")
        }
        (CardDraw::FaceUp(a), Some(CardDraw::FaceUp(b))) if a == b => {
            write!(f, "{player} drew 2 {a} cards")
        }
        (CardDraw::FaceUp(a), Some(CardDraw::FaceUp(b))) => {
            write!(f, "{player} drew 1 {a} card and 1 {b} card")
        }
        (CardDraw::Deck, None) => write!(f, "{player} drew 1 card from deck"),
        (CardDraw::FaceUp(c), None) => write!(f, "{player} drew 1 {c} card"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_route_phrasing() {
        let a = Action::ClaimRoute {
            player: "Ada".into(),
            from: "Denver".into(),
            to: "Omaha".into(),
            color: TrainColor::Red,
        };
        assert_eq!(a.to_string(), "Ada claimed route: Denver to Omaha with red cards");
        assert_eq!(a.edge_label(), "Claim Denver-Omaha");
    }

    #[test]
    fn card_draw_phrasings() {
        let p = || "Bo".to_string();
        let cases = [
            (
                Action::DrawTrainCards {
                    player: p(),
                    first: CardDraw::Deck,
                    second: Some(CardDraw::Deck),
                },
                "Bo drew 2 cards from deck",
            ),
            (
                Action::DrawTrainCards {
                    player: p(),
                    first: CardDraw::Deck,
                    second: Some(CardDraw::FaceUp(TrainColor::Green)),
                },
                "Bo drew 1 card from deck and 1 green card",
            ),
            (
                Action::DrawTrainCards {
                    player: p(),
                    first: CardDraw::FaceUp(TrainColor::Blue),
                    second: Some(CardDraw::Deck),
                },
                "Bo drew 1 blue card and 1 card from deck",
            ),
            (
                Action::DrawTrainCards {
                    player: p(),
                    first: CardDraw::FaceUp(TrainColor::Pink),
                    second: Some(CardDraw::FaceUp(TrainColor::Pink)),
                },
                "Bo drew 2 pink cards",
            ),
            (
                Action::DrawTrainCards {
                    player: p(),
                    first: CardDraw::FaceUp(TrainColor::Pink),
                    second: Some(CardDraw::FaceUp(TrainColor::Black)),
                },
                "Bo drew 1 pink card and 1 black card",
            ),
            (
                Action::DrawTrainCards {
                    player: p(),
                    first: CardDraw::FaceUp(TrainColor::Wild),
                    second: None,
                },
                "Bo drew 1 wild",
            ),
        ];
        for (action, expected) in cases {
            assert_eq!(action.to_string(), expected);
            assert_eq!(action.edge_label(), "Draw Cards");
        }
    }

    #[test]
    fn destination_draw_sums_kept_counts() {
        let a = Action::DrawDestinations {
            player: "Cy".into(),
            kept: [1, 0, 2],
        };
        assert_eq!(a.to_string(), "Cy drew destination tickets and kept 3");
        assert_eq!(a.edge_label(), "Draw Dest 3");
    }

    #[test]
    fn unknown_action_falls_back_to_generic_string() {
        let a = Action::Other {
            player: "Cy".into(),
            description: "passed".into(),
        };
        assert_eq!(a.to_string(), "Cy: passed");
        assert_eq!(a.edge_label(), "passed");
        assert_eq!(a.player(), "Cy");
    }
}
