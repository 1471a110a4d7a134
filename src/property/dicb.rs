//! DICB keyword classification.
//!
//! FITS-compatible header output requires keywords in a fixed order: the
//! structural keywords first, then ordinary primary keywords, then the ESO
//! HIERARCH namespace grouped by subsystem, and the commentary keywords at
//! the very end. [`classify`] maps a keyword name to its class once;
//! [`compare`] then orders two precomputed classes in O(1), so sorting a
//! property collection never re-parses names.

use std::cmp::Ordering;

/// A keyword's position in the DICB ordering scheme. The discriminant is
/// the sort key; [`DicbClass::Unclassified`] is the reserved "not yet
/// classified" value and compares equal to everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DicbClass {
    #[default]
    Unclassified = 0,
    /// `SIMPLE` / `XTENSION`
    Top,
    Bitpix,
    Naxis,
    /// `NAXIS1` through `NAXIS999`
    NaxisN,
    Group,
    Pcount,
    Gcount,
    Extend,
    Bscale,
    Bzero,
    Tfields,
    /// `TBCOL1` through `TBCOL999`
    TbcolN,
    /// `TFORM1` through `TFORM999`
    TformN,
    /// Any other standard-length (<= 8 character) keyword.
    Primary,
    EsoDpr,
    EsoObs,
    EsoTpl,
    EsoGen,
    EsoTel,
    EsoIns,
    EsoDet,
    EsoLog,
    EsoPro,
    /// `ESO` namespace keywords outside the nine known subsystems.
    EsoOther,
    /// Non-ESO keywords longer than the standard 8 characters.
    ForeignHierarch,
    History,
    Comment,
    End,
}

const ESO_SUBSYSTEMS: [(&[u8], DicbClass); 9] = [
    (b"DPR", DicbClass::EsoDpr),
    (b"OBS", DicbClass::EsoObs),
    (b"TPL", DicbClass::EsoTpl),
    (b"GEN", DicbClass::EsoGen),
    (b"TEL", DicbClass::EsoTel),
    (b"INS", DicbClass::EsoIns),
    (b"DET", DicbClass::EsoDet),
    (b"LOG", DicbClass::EsoLog),
    (b"PRO", DicbClass::EsoPro),
];

/// Classifies a keyword name. Pure and allocation free, O(name length).
pub fn classify(name: &str) -> DicbClass {
    let n = name.as_bytes();
    if let Some(rest) = n.strip_prefix(b"ESO ") {
        return eso_class(rest);
    }
    match n {
        b"SIMPLE" | b"XTENSION" => DicbClass::Top,
        b"BITPIX" => DicbClass::Bitpix,
        b"NAXIS" => DicbClass::Naxis,
        b"GROUP" => DicbClass::Group,
        b"PCOUNT" => DicbClass::Pcount,
        b"GCOUNT" => DicbClass::Gcount,
        b"EXTEND" => DicbClass::Extend,
        b"BSCALE" => DicbClass::Bscale,
        b"BZERO" => DicbClass::Bzero,
        b"TFIELDS" => DicbClass::Tfields,
        b"HISTORY" => DicbClass::History,
        b"COMMENT" => DicbClass::Comment,
        b"END" => DicbClass::End,
        _ => {
            if let Some(family) = indexed_family(n) {
                family
            } else if n.len() <= 8 {
                DicbClass::Primary
            } else {
                DicbClass::ForeignHierarch
            }
        }
    }
}

/// Compares two precomputed sort keys. An unclassified key is unordered
/// relative to anything, so sorts using this comparator must be stable and
/// every record must be classified first.
pub fn compare(a: DicbClass, b: DicbClass) -> Ordering {
    if a == DicbClass::Unclassified || b == DicbClass::Unclassified {
        return Ordering::Equal;
    }
    (a as u8).cmp(&(b as u8))
}

fn eso_class(rest: &[u8]) -> DicbClass {
    for (token, class) in ESO_SUBSYSTEMS {
        // the subsystem token must end at a word boundary
        if rest.starts_with(token)
            && rest.get(token.len()).map_or(true, |b| *b == b' ')
        {
            return class;
        }
    }
    DicbClass::EsoOther
}

/// `NAXIS`, `TBCOL` and `TFORM` followed by a 1 to 3 digit index share one
/// class per family; the index itself does not order them.
fn indexed_family(n: &[u8]) -> Option<DicbClass> {
    if n.len() < 6 || n.len() > 8 {
        return None;
    }
    let (prefix, index) = n.split_at(5);
    if !index.iter().all(u8::is_ascii_digit) {
        return None;
    }
    match prefix {
        b"NAXIS" => Some(DicbClass::NaxisN),
        b"TBCOL" => Some(DicbClass::TbcolN),
        b"TFORM" => Some(DicbClass::TformN),
        _ => None,
    }
}
