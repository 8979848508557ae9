use crate::cnf::Literal;
use crate::solver::state::State;
use rand::rngs::StdRng;
use rand::Rng;

/// Takes the first unassigned variable in index order; the sign is the saved
/// phase if there is one, otherwise a coin flip.
pub fn decide(state: &State, rng: &mut StdRng) -> Option<Literal> {
    let var = (1..=state.num_vars).find(|var| state.vars[*var].is_none())?;
    let sign = match state.var_phases[var] {
        Some(phase) => phase,
        None => rng.gen_bool(0.5),
    };
    Some(Literal::from_value(var, sign))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::Clause;
    use rand::SeedableRng;

    #[test]
    fn test_first_unassigned_in_index_order() {
        let mut state = State::init(vec![Clause::from("1 2 3")], 3);
        state.vars[1] = Some(true);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(decide(&state, &mut rng).unwrap().id(), 2);
    }

    #[test]
    fn test_saved_phase_beats_coin_flip() {
        let mut state = State::init(vec![Clause::from("1 2")], 2);
        state.var_phases[1] = Some(false);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            assert_eq!(decide(&state, &mut rng), Some(Literal::new(-1)));
        }
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let state = State::init(vec![Clause::from("1 2")], 2);
        let signs: Vec<bool> = (0..8)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(7);
                decide(&state, &mut rng).unwrap().positive()
            })
            .collect();
        assert!(signs.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_none_when_all_assigned() {
        let mut state = State::init(vec![Clause::from("1 2")], 2);
        state.vars[1] = Some(true);
        state.vars[2] = Some(true);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(decide(&state, &mut rng), None);
    }
}
