//=========================================================================
// Interaction Kinds
//=========================================================================
//
// Which body region a trigger volume addresses, and how kinds rank
// against each other when several volumes overlap.
//
//   class 2  primary contact  (mouth, chest, genital, anal, rear)
//   class 1  reaction zones   (head, body, limbs)
//   class 0  none
//
//=========================================================================

//=== InteractionKind =====================================================

/// Body region an interaction targets.
///
/// Declaration order matches the host's own enumeration: every primary
/// contact kind precedes every reaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum InteractionKind {
    #[default]
    None,

    //--- Primary contact --------------------------------------------------
    Mouth,
    ChestLeft,
    ChestRight,
    Genital,
    Anal,
    RearLeft,
    RearRight,

    //--- Reaction zones ---------------------------------------------------
    ReactHead,
    ReactUpperBody,
    ReactLowerBody,
    ReactArmLeft,
    ReactArmRight,
    ReactLegLeft,
    ReactLegRight,
}

impl InteractionKind {
    /// Selection class: primary contact 2, reaction 1, none 0.
    pub fn priority_class(self) -> u8 {
        if self == Self::None {
            0
        } else if self.is_primary_contact() {
            2
        } else {
            1
        }
    }

    pub fn is_primary_contact(self) -> bool {
        Self::Mouth <= self && self < Self::ReactHead
    }

    pub fn is_reaction(self) -> bool {
        self >= Self::ReactHead
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

//=== InteractionTarget ===================================================

/// Resolved (owner, kind) pair a user action is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InteractionTarget {
    /// Index of the character owning the volume.
    pub owner: usize,
    pub kind: InteractionKind,
}

impl InteractionTarget {
    /// No target; routes nothing.
    pub const NONE: Self = Self {
        owner: 0,
        kind: InteractionKind::None,
    };

    pub fn new(owner: usize, kind: InteractionKind) -> Self {
        Self { owner, kind }
    }
}

//=== Tag Table ===========================================================

/// Prefix the host puts on every interaction volume tag.
pub const VOLUME_TAG_PREFIX: &str = "H/Aibu/Hit/";

/// Candidate kinds for a host volume tag, in gate-evaluation order.
///
/// Tags lacking [`VOLUME_TAG_PREFIX`] or naming an unknown region yield
/// `None`.
pub fn candidate_kinds(tag: &str) -> Option<&'static [InteractionKind]> {
    use InteractionKind::*;

    let region = tag.strip_prefix(VOLUME_TAG_PREFIX)?;
    let kinds: &'static [InteractionKind] = match region {
        "mouth" => &[Mouth, ReactHead],
        "muneL" => &[ChestLeft, ReactUpperBody],
        "muneR" => &[ChestRight, ReactUpperBody],
        "kokan" => &[Genital, ReactLowerBody],
        "anal" => &[Anal, ReactLowerBody],
        "siriL" => &[RearLeft, ReactLowerBody],
        "siriR" => &[RearRight, ReactLowerBody],
        "Reaction/head" => &[ReactHead],
        "Reaction/bodyup" => &[ReactUpperBody],
        "Reaction/bodydown" => &[ReactLowerBody],
        "Reaction/armL" => &[ReactArmLeft],
        "Reaction/armR" => &[ReactArmRight],
        "Reaction/legL" => &[ReactLegLeft],
        "Reaction/legR" => &[ReactLegRight],
        _ => return Option::None,
    };
    Some(kinds)
}

//=========================================================================
// Unit Tests
//=========================================================================
