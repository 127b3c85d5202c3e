//! The fixed member set for one trip.
//!
//! The roster is supplied by trip configuration, not derived from records.
//! Declaration order is significant: it is the stable tie-break order for
//! settlement and the display order for balances.
use serde::{Deserialize, Serialize};

use crate::{LedgerError, LedgerResult};

/// Upper bound on trip size; the settlement matching assumes a small group.
pub const MAX_MEMBERS: usize = 8;

/// Opaque handle to one roster member.
///
/// Only obtainable through [`Roster::member`], so holding a `MemberId` means
/// the code was accepted against the closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(usize);

impl MemberId {
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// The closed, ordered member set of a trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    codes: Vec<String>,
}

impl Roster {
    /// Builds a roster from member codes, rejecting empty, duplicate or
    /// oversized sets. Codes are trimmed; order is preserved.
    pub fn new<I, S>(codes: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: Vec<String> = codes
            .into_iter()
            .map(|code| code.as_ref().trim().to_string())
            .collect();

        if codes.is_empty() {
            return Err(LedgerError::InvalidRoster("no members".to_string()));
        }
        if codes.len() > MAX_MEMBERS {
            return Err(LedgerError::InvalidRoster(format!(
                "at most {MAX_MEMBERS} members supported, got {}",
                codes.len()
            )));
        }
        for (i, code) in codes.iter().enumerate() {
            if code.is_empty() {
                return Err(LedgerError::InvalidRoster("empty member code".to_string()));
            }
            if codes[..i].contains(code) {
                return Err(LedgerError::InvalidRoster(format!(
                    "duplicate member code: {code}"
                )));
            }
        }

        Ok(Self { codes })
    }

    /// Resolves a member code, rejecting anything outside the set.
    pub fn member(&self, code: &str) -> LedgerResult<MemberId> {
        let code = code.trim();
        self.codes
            .iter()
            .position(|c| c == code)
            .map(MemberId)
            .ok_or_else(|| LedgerError::UnknownMember(code.to_string()))
    }

    /// The canonical code of a member.
    #[must_use]
    pub fn code(&self, member: MemberId) -> &str {
        &self.codes[member.0]
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        (0..self.codes.len()).map(MemberId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_codes_in_declaration_order() {
        let roster = Roster::new(["ME", "A", "B"]).unwrap();
        let me = roster.member("ME").unwrap();
        let b = roster.member("B").unwrap();
        assert!(me < b);
        assert_eq!(roster.code(me), "ME");
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn rejects_unknown_member() {
        let roster = Roster::new(["ME", "A"]).unwrap();
        assert_eq!(
            roster.member("Z"),
            Err(LedgerError::UnknownMember("Z".to_string()))
        );
    }

    #[test]
    fn rejects_bad_rosters() {
        assert!(Roster::new(Vec::<String>::new()).is_err());
        assert!(Roster::new(["ME", "ME"]).is_err());
        assert!(Roster::new(["ME", " "]).is_err());
        assert!(Roster::new((0..9).map(|i| format!("M{i}"))).is_err());
    }
}
