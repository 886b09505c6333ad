use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encode::{decode_move, encode_move};
use crate::r#move::Move;

/// Serialize Move as its wire-format byte record.
impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&encode_move(self))
    }
}

/// Deserialize Move from its wire-format byte record.
impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        decode_move(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceType;
    use crate::square::Square;

    fn sq(row: i8, col: i8) -> Square {
        Square::new(row, col).expect("in-bounds square")
    }

    #[test]
    fn test_move_serde_round_trip() {
        let moves = [
            Move::Standard {
                from: sq(6, 4),
                to: sq(4, 4),
            },
            Move::Castle {
                from: sq(7, 4),
                to: sq(7, 6),
                rook_from: sq(7, 7),
                rook_to: sq(7, 5),
            },
            Move::EnPassant {
                from: sq(3, 4),
                to: sq(2, 3),
                captured: sq(3, 3),
            },
            Move::Promotion {
                from: sq(1, 0),
                to: sq(0, 0),
                promote_to: PieceType::Queen,
            },
        ];

        for mv in moves {
            let json = serde_json::to_string(&mv).expect("serializable");
            let back: Move = serde_json::from_str(&json).expect("well-formed record");
            assert!(back.is_equivalent_to(&mv));
        }
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        // A standard-move record cut short.
        let result: Result<Move, _> = serde_json::from_str("[0, 6, 4, 5]");
        assert!(result.is_err());
    }
}
