use super::*;

/// Generation strategy that picks a random start cell, keeps it and its neighborhood clear so the first opening is
/// always a zero, and scatters the mines uniformly over the rest of the board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: &GameConfig) -> Result<Minefield> {
        use rand::prelude::*;

        config.validate()?;

        let (width, height) = config.size;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let start = (rng.random_range(0..width), rng.random_range(0..height));
        log::debug!("Generating {:?} minefield, start at {:?}", config.size, start);

        // validate() leaves more free cells than mines, so rejection sampling terminates
        let mut mask = Board::filled(config.size, false)?;
        let mut mines_placed = 0;
        while mines_placed < config.mines {
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            if mask[coords] || touches(coords, start) {
                continue;
            }
            mask[coords] = true;
            mines_placed += 1;
        }

        Ok(Minefield::from_mine_mask(&mask, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, config: GameConfig) -> Minefield {
        RandomMinefieldGenerator::new(seed).generate(&config).unwrap()
    }

    #[test]
    fn start_neighborhood_is_mine_free() {
        for seed in 0..32 {
            let field = generate(seed, GameConfig::expert());
            let secret = field.secret();

            assert_eq!(secret[field.start()], MineOrCount::Count(0));
            for pos in secret.iter_neighbors(field.start()) {
                // neighbors may still see mines further out
                assert!(!secret[pos].is_mine(), "seed {seed}, cell {pos:?}");
            }
        }
    }

    #[test]
    fn places_exactly_the_requested_mines() {
        let field = generate(7, GameConfig::intermediate());

        assert_eq!(field.mine_count(), 40);
        assert_eq!(field.secret().count(MineOrCount::is_mine), 40);
    }

    #[test]
    fn counts_match_adjacent_mines() {
        let field = generate(3, GameConfig::beginner());
        let secret = field.secret();

        for (coords, cell) in secret.iter() {
            if let MineOrCount::Count(count) = cell {
                assert_eq!(count, secret.count_neighbors(coords, MineOrCount::is_mine));
            }
        }
    }

    #[test]
    fn same_seed_same_field() {
        assert_eq!(
            generate(42, GameConfig::expert()),
            generate(42, GameConfig::expert())
        );
    }

    #[test]
    fn rejects_crowded_config() {
        let config = GameConfig {
            size: (4, 4),
            mines: 7,
            flag_policy: FlagPolicy::default(),
        };

        let result = RandomMinefieldGenerator::new(0).generate(&config);

        assert_eq!(
            result,
            Err(GameError::TooManyMines { mines: 7, max: 6 })
        );
    }
}
