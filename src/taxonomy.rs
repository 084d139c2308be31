//src/taxonomy.rs

use ahash::AHashMap;

/// The seven ranks a compact taxonomy string can carry, most general first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxRank {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

pub type RankMap = AHashMap<TaxRank, String>;

/// Scan order for `lowest`: most specific rank first.
const MOST_SPECIFIC_FIRST: [TaxRank; 7] = [
    TaxRank::Species,
    TaxRank::Genus,
    TaxRank::Family,
    TaxRank::Order,
    TaxRank::Class,
    TaxRank::Phylum,
    TaxRank::Kingdom,
];

impl TaxRank {
    /// Display label used when reporting a resolved rank.
    pub fn label(&self) -> &'static str {
        match self {
            TaxRank::Kingdom => "Kingdom",
            TaxRank::Phylum => "Phylum",
            TaxRank::Class => "Class",
            TaxRank::Order => "Order",
            TaxRank::Family => "Family",
            TaxRank::Genus => "Genus",
            TaxRank::Species => "Species",
        }
    }

    /// Maps the letter before `__` in a taxonomy segment to its rank.
    fn from_prefix(prefix: &str) -> Option<TaxRank> {
        match prefix {
            "d" => Some(TaxRank::Kingdom),
            "p" => Some(TaxRank::Phylum),
            "c" => Some(TaxRank::Class),
            "o" => Some(TaxRank::Order),
            "f" => Some(TaxRank::Family),
            "g" => Some(TaxRank::Genus),
            "s" => Some(TaxRank::Species),
            _ => None,
        }
    }
}

/// Decomposes a taxonomy string in the format:
/// ```text
/// "d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__;f__;g__;s__"
/// ```
/// into a rank -> name map. Strings without the `d__` lead-in (after
/// stripping surrounding quotes) produce an empty map; empty or
/// unrecognized segments contribute nothing.
pub fn decompose(taxonomy: &str) -> RankMap {
    let mut ranks = RankMap::new();

    let trimmed = taxonomy.trim_matches('"');
    if !trimmed.starts_with("d__") {
        return ranks;
    }

    for segment in trimmed.split(';') {
        let (prefix, name) = match segment.split_once("__") {
            Some(pair) => pair,
            None => continue,
        };
        let rank = match TaxRank::from_prefix(prefix) {
            Some(rank) => rank,
            None => continue,
        };
        if !name.is_empty() {
            ranks.insert(rank, name.to_string());
        }
    }
    ranks
}

/// Returns the most specific non-empty rank in `ranks`, scanning
/// species up to kingdom.
pub fn lowest(ranks: &RankMap) -> Option<(TaxRank, &str)> {
    MOST_SPECIFIC_FIRST.iter().find_map(|rank| {
        ranks
            .get(rank)
            .filter(|name| !name.is_empty())
            .map(|name| (*rank, name.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_quoted_taxonomy_string() {
        let ranks = decompose("\"d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__;f__;g__;s__\"");
        assert_eq!(ranks.get(&TaxRank::Kingdom).map(String::as_str), Some("Bacteria"));
        assert_eq!(ranks.get(&TaxRank::Phylum).map(String::as_str), Some("Proteobacteria"));
        assert_eq!(
            ranks.get(&TaxRank::Class).map(String::as_str),
            Some("Gammaproteobacteria")
        );
        assert!(ranks.get(&TaxRank::Order).is_none());
        assert!(ranks.get(&TaxRank::Species).is_none());
    }

    #[test]
    fn lowest_resolves_class_when_deeper_ranks_are_empty() {
        let ranks = decompose("\"d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__;f__;g__;s__\"");
        let (rank, name) = lowest(&ranks).unwrap();
        assert_eq!(rank, TaxRank::Class);
        assert_eq!(rank.label(), "Class");
        assert_eq!(name, "Gammaproteobacteria");
    }

    #[test]
    fn non_taxonomy_strings_decompose_to_nothing() {
        assert!(decompose("").is_empty());
        assert!(decompose("Escherichia coli").is_empty());
        // Missing the d__ lead-in entirely
        assert!(decompose("p__Proteobacteria;c__Gammaproteobacteria").is_empty());
    }

    #[test]
    fn unrecognized_segments_are_skipped() {
        let ranks = decompose("d__Bacteria;x__Mystery;notasegment;s__Escherichia coli");
        assert_eq!(ranks.len(), 2);
        assert_eq!(
            lowest(&ranks).map(|(rank, name)| (rank.label(), name)),
            Some(("Species", "Escherichia coli"))
        );
    }

    #[test]
    fn lowest_of_empty_map_is_none() {
        assert!(lowest(&RankMap::new()).is_none());
    }
}
