use carbon_token_core::{AccountId, CallContext, ErrorKind, TokenEngine};
use proptest::prelude::*;

const HOLDERS: u8 = 4;

#[derive(Clone, Debug)]
enum Op {
    Mint { caller: u8, to: u8, amount: u64 },
    Burn { caller: u8, amount: u64 },
    Transfer { caller: u8, to: u8, amount: u64 },
    SetAdmin { caller: u8, new_admin: Option<u8> },
}

fn account(i: u8) -> AccountId {
    AccountId::from_bytes(vec![i])
}

fn amount() -> impl Strategy<Value = u64> {
    prop_oneof![
        8 => 0u64..2_000,
        1 => Just(0u64),
        1 => Just(u64::MAX),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..HOLDERS, 0..HOLDERS, amount())
            .prop_map(|(caller, to, amount)| Op::Mint { caller, to, amount }),
        (0..HOLDERS, amount()).prop_map(|(caller, amount)| Op::Burn { caller, amount }),
        (0..HOLDERS, 0..HOLDERS, amount())
            .prop_map(|(caller, to, amount)| Op::Transfer { caller, to, amount }),
        (0..HOLDERS, proptest::option::of(0..HOLDERS))
            .prop_map(|(caller, new_admin)| Op::SetAdmin { caller, new_admin }),
    ]
}

fn apply(engine: &mut TokenEngine, op: &Op, height: u64) -> Result<u64, ErrorKind> {
    let result = match *op {
        Op::Mint { caller, to, amount } => {
            engine.mint(&CallContext::new(account(caller), height), account(to), amount)
        }
        Op::Burn { caller, amount } => {
            engine.burn(&CallContext::new(account(caller), height), amount)
        }
        Op::Transfer { caller, to, amount } => {
            engine.transfer(&CallContext::new(account(caller), height), account(to), amount)
        }
        Op::SetAdmin { caller, new_admin } => engine.set_admin(
            &CallContext::new(account(caller), height),
            new_admin.map(account),
        ),
    };
    result.map_err(|e| e.kind())
}

proptest! {
    #[test]
    fn supply_is_conserved_and_failures_leave_no_trace(
        initial in 0u64..1_000_000,
        ops in prop::collection::vec(op(), 0..64),
    ) {
        let mut engine = TokenEngine::default();
        engine.initialize(0, account(0), initial).unwrap();
        let mut expected_seq = 1u64;

        for (height, op) in ops.iter().enumerate() {
            let before = engine.snapshot();
            let log_len = engine.events().len();
            match apply(&mut engine, op, height as u64 + 1) {
                Ok(seq) => {
                    prop_assert_eq!(seq, expected_seq);
                    expected_seq += 1;
                }
                Err(_) => {
                    prop_assert_eq!(&engine.snapshot(), &before);
                    prop_assert_eq!(engine.events().len(), log_len);
                }
            }
            let snapshot = engine.snapshot();
            prop_assert_eq!(snapshot.sum_of_balances(), Some(snapshot.total_supply));
        }

        let seqs: Vec<u64> = engine.events().iterate(0).map(|e| e.seq).collect();
        let expected: Vec<u64> = (0..expected_seq).collect();
        prop_assert_eq!(seqs, expected);
    }

    #[test]
    fn only_the_admin_can_mint(caller in 1..HOLDERS, to in 0..HOLDERS, amount in amount()) {
        let mut engine = TokenEngine::default();
        engine.initialize(0, account(0), 100).unwrap();
        let op = Op::Mint { caller, to, amount };
        prop_assert_eq!(apply(&mut engine, &op, 1), Err(ErrorKind::Unauthorized));

        let op = Op::Mint { caller: 0, to, amount: amount.min(1_000) };
        prop_assert!(apply(&mut engine, &op, 2).is_ok());
    }

    #[test]
    fn burn_touches_only_the_caller(
        caller in 0..HOLDERS,
        amount in 0u64..500,
    ) {
        let mut engine = TokenEngine::default();
        engine.initialize(0, account(0), 0).unwrap();
        for i in 0..HOLDERS {
            engine.mint(&CallContext::new(account(0), 0), account(i), 500).unwrap();
        }
        let before = engine.snapshot();
        engine.burn(&CallContext::new(account(caller), 1), amount).unwrap();
        let after = engine.snapshot();

        for i in 0..HOLDERS {
            let expected = if i == caller { 500 - amount } else { 500 };
            prop_assert_eq!(engine.balance_of(&account(i)), expected);
        }
        prop_assert_eq!(after.total_supply, before.total_supply - amount);
    }
}
