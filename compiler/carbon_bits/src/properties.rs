//! Property tests: the word-level operators agree with a naive
//! bit-at-a-time model built from `Vec<bool>`.

use proptest::prelude::*;

use crate::{BitOp, BitSequence};

fn arb_bits(max_len: usize) -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), 0..max_len)
}

fn seq(model: &[bool]) -> BitSequence {
    model.iter().copied().collect()
}

fn model(seq: &BitSequence) -> Vec<bool> {
    seq.iter().collect()
}

fn apply_model(op: BitOp, a: bool, b: bool) -> bool {
    op.apply(u64::from(a), u64::from(b)) & 1 == 1
}

fn arb_op() -> impl Strategy<Value = BitOp> {
    prop_oneof![
        Just(BitOp::And),
        Just(BitOp::Or),
        Just(BitOp::Xor),
        Just(BitOp::Nand),
        Just(BitOp::Nor),
        Just(BitOp::Nxor),
    ]
}

proptest! {
    #[test]
    fn concat_matches_model(a in arb_bits(300), b in arb_bits(300)) {
        let joined = seq(&a).concat(&seq(&b));
        let mut expected = a.clone();
        expected.extend_from_slice(&b);
        prop_assert_eq!(model(&joined), expected);
    }

    #[test]
    fn subseq_matches_model(bits in arb_bits(400), start in 0usize..400, size in 0usize..400) {
        let sequence = seq(&bits);
        let result = sequence.subseq(start, size);
        if start + size <= bits.len() {
            prop_assert_eq!(model(&result.unwrap()), bits[start..start + size].to_vec());
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn head_tail_split_rejoins(bits in arb_bits(300), cut in 0usize..300) {
        let sequence = seq(&bits);
        let cut = cut.min(bits.len());
        let head = sequence.head(cut).unwrap();
        let tail = sequence.tail(bits.len() - cut).unwrap();
        prop_assert_eq!(head.concat(&tail), sequence);
    }

    #[test]
    fn repeat_tiles_pattern(pattern in arb_bits(70), target in 0usize..500) {
        prop_assume!(!pattern.is_empty());
        let repeated = seq(&pattern).repeat(target).unwrap();
        let expected: Vec<bool> = pattern.iter().copied().cycle().take(target).collect();
        prop_assert_eq!(model(&repeated), expected);
    }

    #[test]
    fn popcount_matches_model(bits in arb_bits(500)) {
        let ones = bits.iter().filter(|&&b| b).count();
        prop_assert_eq!(seq(&bits).popcount(), ones);
    }

    #[test]
    fn ordering_matches_integer_order(a in any::<u64>(), b in any::<u64>(), width in 1usize..=64) {
        let left = BitSequence::from_word(a, width);
        let right = BitSequence::from_word(b, width);
        let mask = crate::low_mask(width as u32);
        prop_assert_eq!(left.try_cmp(&right).unwrap(), (a & mask).cmp(&(b & mask)));
    }

    #[test]
    fn double_inversion_is_identity(bits in arb_bits(300)) {
        let sequence = seq(&bits);
        prop_assert_eq!(sequence.invert().invert(), sequence);
    }

    #[test]
    fn plain_ops_match_model(op in arb_op(), pairs in proptest::collection::vec(any::<(bool, bool)>(), 0..300)) {
        let (a, b): (Vec<bool>, Vec<bool>) = pairs.into_iter().unzip();
        let result = seq(&a).combine(op, &seq(&b)).unwrap();
        let expected: Vec<bool> = a.iter().zip(&b).map(|(&x, &y)| apply_model(op, x, y)).collect();
        prop_assert_eq!(model(&result), expected);
    }

    #[test]
    fn plain_ops_reject_unequal(op in arb_op(), a in arb_bits(100), b in arb_bits(100)) {
        prop_assume!(a.len() != b.len());
        prop_assert!(seq(&a).combine(op, &seq(&b)).is_err());
    }

    #[test]
    fn clip_ops_match_model(op in arb_op(), a in arb_bits(200), b in arb_bits(200)) {
        let result = seq(&a).combine_clip(op, &seq(&b));
        let expected: Vec<bool> = a.iter().zip(&b).map(|(&x, &y)| apply_model(op, x, y)).collect();
        prop_assert_eq!(model(&result), expected);
    }

    #[test]
    fn repeat_ops_match_model(op in arb_op(), long in arb_bits(300), short in arb_bits(80)) {
        prop_assume!(long.len() > short.len());
        let result = seq(&long).combine_repeat(op, &seq(&short));
        let tiled: Vec<bool> = if short.is_empty() {
            vec![false; long.len()]
        } else {
            short.iter().copied().cycle().take(long.len()).collect()
        };
        let expected: Vec<bool> = long.iter().zip(&tiled).map(|(&x, &y)| apply_model(op, x, y)).collect();
        prop_assert_eq!(model(&result), expected);
    }
}
