//! CIM enumerations

use crate::attribute::CimEnum;
use serde::{Deserialize, Serialize};

/// Phases of a terminal or conducting equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseCode {
    ABCN,
    ABC,
    ABN,
    ACN,
    BCN,
    AB,
    AC,
    BC,
    AN,
    BN,
    CN,
    A,
    B,
    C,
    N,
    S1N,
    S2N,
    S12N,
    S1,
    S2,
    S12,
}

impl PhaseCode {
    pub fn all() -> &'static [PhaseCode] {
        use PhaseCode::*;
        &[
            ABCN, ABC, ABN, ACN, BCN, AB, AC, BC, AN, BN, CN, A, B, C, N, S1N, S2N, S12N, S1, S2,
            S12,
        ]
    }
}

impl CimEnum for PhaseCode {
    const ENUM_NAME: &'static str = "PhaseCode";

    fn literal(&self) -> &'static str {
        match self {
            PhaseCode::ABCN => "ABCN",
            PhaseCode::ABC => "ABC",
            PhaseCode::ABN => "ABN",
            PhaseCode::ACN => "ACN",
            PhaseCode::BCN => "BCN",
            PhaseCode::AB => "AB",
            PhaseCode::AC => "AC",
            PhaseCode::BC => "BC",
            PhaseCode::AN => "AN",
            PhaseCode::BN => "BN",
            PhaseCode::CN => "CN",
            PhaseCode::A => "A",
            PhaseCode::B => "B",
            PhaseCode::C => "C",
            PhaseCode::N => "N",
            PhaseCode::S1N => "s1N",
            PhaseCode::S2N => "s2N",
            PhaseCode::S12N => "s12N",
            PhaseCode::S1 => "s1",
            PhaseCode::S2 => "s2",
            PhaseCode::S12 => "s12",
        }
    }

    fn from_literal(literal: &str) -> Option<Self> {
        PhaseCode::all()
            .iter()
            .copied()
            .find(|code| code.literal() == literal)
    }
}

impl std::fmt::Display for PhaseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_code_forms() {
        assert_eq!(PhaseCode::parse("ABC"), Some(PhaseCode::ABC));
        assert_eq!(PhaseCode::parse("PhaseCode.s12N"), Some(PhaseCode::S12N));
        assert_eq!(
            PhaseCode::parse("http://iec.ch/TC57/CIM100#PhaseCode.AN"),
            Some(PhaseCode::AN)
        );
        assert_eq!(PhaseCode::parse("PhaseCode.XYZ"), None);
    }

    #[test]
    fn test_phase_code_roundtrip() {
        for code in PhaseCode::all() {
            assert_eq!(PhaseCode::parse(&code.qualified()), Some(*code));
        }
    }
}
