/// Asserts that the living population matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.population(), $count, "Population count mismatch");
    };
}

/// Asserts that a float lies in the inclusive range `[lo, hi]`.
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $lo:expr, $hi:expr) => {
        let value = $value;
        assert!(
            value >= $lo && value <= $hi,
            "{} = {} is outside [{}, {}]",
            stringify!($value),
            value,
            $lo,
            $hi
        );
    };
}

/// Asserts that every gene of a genome lies within the given bounds.
#[macro_export]
macro_rules! assert_gene_bounds {
    ($genome:expr, $min:expr, $max:expr) => {
        for (name, gene) in &$genome.genes {
            assert!(
                gene.value >= $min && gene.value <= $max,
                "Gene {} = {} escaped [{}, {}]",
                name,
                gene.value,
                $min,
                $max
            );
        }
    };
}

/// Asserts a team's member count.
#[macro_export]
macro_rules! assert_team_size {
    ($world:expr, $id:expr, $size:expr) => {
        let team = $world.teams.get($id).expect("Team not found");
        assert_eq!(team.size(), $size, "Team {} size mismatch", $id);
    };
}
