use enum_map::Enum;
use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
use tagtable::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Counter {
    count: i64,
}

#[derive(Debug, EnumDiscriminants, Tagged)]
#[strum_discriminants(name(CounterTag))]
#[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[tagged(tag = CounterTag)]
enum CounterAction {
    Increment,
    Decrement,
}

/// What a producer sends over the wire: the discriminant is just a string.
type WireAction = Envelope<CounterTag>;

type CounterTable<A> = HandlerTable<CounterTag, dyn ReducerHandler<Counter, A>>;

fn counter_table<A: Tagged<Tag = CounterTag> + 'static>() -> CounterTable<A> {
    CounterTable::<A>::from_fn(|tag| match tag {
        CounterTag::Increment => pure(|s: &Counter, _: &A| Counter { count: s.count + 1 }),
        CounterTag::Decrement => pure(|s: &Counter, _: &A| Counter { count: s.count - 1 }),
    })
}

#[test]
fn increment_and_decrement() {
    let reduce = build_reducer(counter_table::<CounterAction>());
    let state = Counter { count: 5 };

    assert_eq!(
        reduce.reduce(&state, &CounterAction::Increment),
        Ok(Counter { count: 6 })
    );
    assert_eq!(
        reduce.reduce(&state, &CounterAction::Decrement),
        Ok(Counter { count: 4 })
    );
    // the input state is never touched
    assert_eq!(state, Counter { count: 5 });
}

#[test]
fn reset_is_not_handled() {
    let reduce = build_reducer(counter_table::<WireAction>());
    let state = Counter { count: 5 };

    assert_eq!(
        reduce.reduce(&state, &Envelope::bare(CounterTag::Increment)),
        Ok(Counter { count: 6 })
    );

    let err = reduce.reduce(&state, &Envelope::raw("reset", ())).unwrap_err();
    assert_eq!(
        err,
        Error::Unhandled {
            discriminant: "reset".to_string()
        }
    );
    assert!(err.to_string().contains("reset"));
}

#[test]
fn every_tag_has_a_handler() {
    let reduce = build_reducer(counter_table::<WireAction>());
    assert!(reduce.table().is_total());

    for tag in CounterTag::all() {
        let action = Envelope::bare(tag);
        assert!(
            reduce.reduce(&Counter { count: 0 }, &action).is_ok(),
            "tag {} should be handled",
            tag.name()
        );
    }
}

#[test]
fn building_twice_behaves_the_same() {
    let table = counter_table::<WireAction>();
    let first = build_reducer(table.clone());
    let second = build_reducer(table);

    let inputs = ["increment", "decrement", "reset", "Increment", ""];
    for count in [-3, 0, 5] {
        for input in inputs {
            let state = Counter { count };
            let action = Envelope::raw(input, ());
            assert_eq!(
                first.reduce(&state, &action),
                second.reduce(&state, &action),
                "diverged on {input:?} from {count}"
            );
        }
    }
}

#[test]
fn reducer_is_shareable_across_threads() {
    let reduce = build_reducer(counter_table::<CounterAction>());

    let totals: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let reduce = &reduce;
                scope.spawn(move || {
                    let actions = std::iter::repeat_n(&CounterAction::Increment, 100 * (i + 1));
                    reduce.reduce_all(Counter { count: 0 }, actions).unwrap().count
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(totals, [100, 200, 300, 400]);
}
