use crate::*;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_i64(&mut self, start: i64, end_exclusive: i64) -> i64 {
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as i64
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Row {
    index: u32,
    template: &'static str,
    label: String,
}

impl ItemData for Row {
    type Index = u32;
    type Template = &'static str;

    fn index(&self) -> &u32 {
        &self.index
    }

    fn template(&self) -> &&'static str {
        &self.template
    }
}

fn row(index: u32, template: &'static str) -> Row {
    Row {
        index,
        template,
        label: index.to_string(),
    }
}

fn rows(n: u32) -> Vec<Row> {
    (0..n).map(|i| row(i, "row")).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Ray(u8);

#[derive(Debug)]
struct Widget {
    serial: usize,
    template: &'static str,
    bound: Option<u32>,
    label: String,
    setups: usize,
    active: bool,
    connected: bool,
    hooks: Option<ListHooks<u32, Ray>>,
}

impl ListItem<Row, Ray> for Widget {
    fn setup(&mut self, data: &Row) {
        assert_eq!(data.template, self.template, "instance rebound across templates");
        self.bound = Some(data.index);
        self.label = data.label.clone();
        self.setups += 1;
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn bind_hooks(&mut self, hooks: ListHooks<u32, Ray>) {
        self.hooks = Some(hooks);
    }
}

#[derive(Debug, Default)]
struct Host {
    instantiated: usize,
    connected: usize,
    positions: Vec<(u32, usize)>,
    // Position calls that still report `Moving`.
    moving_budget: usize,
    signal_via_hooks: bool,
}

impl ItemHost<Row> for Host {
    type Prototype = &'static str;
    type Handle = Ray;
    type Item = Widget;

    fn instantiate(&mut self, prototype: &&'static str) -> Widget {
        self.instantiated += 1;
        Widget {
            serial: self.instantiated,
            template: prototype,
            bound: None,
            label: String::new(),
            setups: 0,
            active: true,
            connected: false,
            hooks: None,
        }
    }

    fn connect(&mut self, item: &mut Widget) {
        assert_eq!(item.setups, 0, "connect must run before the first setup");
        item.connected = true;
        self.connected += 1;
    }

    fn position(&mut self, item: &mut Widget, visible_offset: usize) -> Placement {
        self.positions.push((item.bound.unwrap_or(u32::MAX), visible_offset));
        if self.signal_via_hooks {
            if let Some(hooks) = &item.hooks {
                hooks.signal_motion();
            }
        }
        if self.moving_budget > 0 {
            self.moving_budget -= 1;
            Placement::Moving
        } else {
            Placement::Settled
        }
    }
}

fn recycler_with(options: RecyclerOptions) -> Recycler<Row, Host> {
    let mut r = Recycler::new(Host::default(), options);
    r.register_template("row", "row");
    r.register_template("header", "header");
    r
}

fn recycler() -> Recycler<Row, Host> {
    recycler_with(RecyclerOptions::default())
}

fn serial_of(r: &Recycler<Row, Host>, index: u32) -> Option<usize> {
    r.list_item(&index).map(|w| w.serial)
}

fn sorted_active(r: &Recycler<Row, Host>) -> Vec<u32> {
    let mut out = r.active_indices();
    out.sort_unstable();
    out
}

fn assert_disjoint(r: &Recycler<Row, Host>) {
    assert_eq!(
        r.active_len() + r.parked_total(),
        r.instance_count(),
        "every instance must be either active or parked"
    );
    r.for_each_active(|index, item| {
        assert_eq!(item.bound, Some(*index));
        assert!(item.active);
        let id = r.item_id(index).unwrap();
        assert_eq!(r.location(id), Some(ItemLocation::Active(*index)));
    });
}

fn assert_visibility(r: &Recycler<Row, Host>) {
    let window = r.visible_window();
    let offset = r.data_offset();
    for (i, datum) in r.data().unwrap_or(&[]).iter().enumerate() {
        let pos = i as i64 + offset;
        assert_eq!(
            r.item_id(&datum.index).is_some(),
            window.contains(pos),
            "row {i} (pos {pos}) in window {window:?}"
        );
    }
}

#[test]
fn first_pass_binds_rows_inside_window() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);

    let stats = r.update_items();

    assert_eq!(sorted_active(&r), vec![0, 1, 2, 3, 4]);
    assert_eq!(stats.acquired, 5);
    assert_eq!(stats.instantiated, 5);
    assert_eq!(stats.reused, 0);
    assert_eq!(stats.positioned, 5);
    assert_eq!(r.host().connected, 5);
    assert_eq!(
        r.host().positions,
        vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]
    );
    assert_visibility(&r);
    assert_disjoint(&r);
}

#[test]
fn leading_row_stays_bound_one_row_past_the_edge() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(-3, 5);
    r.update_items();

    // pos = i - 3 must lie in [-1, 4].
    assert_eq!(sorted_active(&r), vec![2, 3, 4, 5, 6, 7]);
    assert!(serial_of(&r, 2).is_some());
    assert_visibility(&r);
}

#[test]
fn custom_overscan_widens_the_window() {
    let mut r = recycler_with(RecyclerOptions::new().with_overscan(0, 2));
    r.set_data(Some(rows(10)));
    r.set_window(-3, 5);
    r.update_items();

    // pos in [0, 6] → i in [3, 9].
    assert_eq!(sorted_active(&r), vec![3, 4, 5, 6, 7, 8, 9]);
    assert_visibility(&r);
}

#[test]
fn scrolling_releases_and_reuses() {
    let mut r = recycler();
    r.set_data(Some(rows(20)));
    r.set_window(0, 5);
    r.update_items();
    let serial_0 = serial_of(&r, 0).unwrap();

    r.set_data_offset(-3);
    let stats = r.update_items();

    // Window now covers i in [2, 7]; 0 and 1 were released before 5..=7 were acquired.
    assert_eq!(stats.released, 2);
    assert_eq!(stats.acquired, 3);
    assert_eq!(stats.reused, 2);
    assert_eq!(stats.instantiated, 1);
    assert_eq!(r.host().instantiated, 6);
    assert_eq!(serial_of(&r, 5), Some(serial_0));
    assert_visibility(&r);
    assert_disjoint(&r);
}

#[test]
fn set_data_mid_scroll_parks_everything_and_resets_offset() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(-3, 5);
    r.update_items();
    assert_eq!(r.active_len(), 6);

    let previous = r.set_data(Some(rows(10)));

    assert_eq!(previous.map(|d| d.len()), Some(10));
    assert_eq!(r.active_len(), 0);
    assert_eq!(r.parked_len(&"row"), 6);
    assert_eq!(r.data_offset(), 0);
    assert_eq!(r.instance_count(), 6);
    assert_disjoint(&r);

    let stats = r.update_items();
    assert_eq!(stats.instantiated, 0);
    assert_eq!(stats.reused, 5);
    assert_eq!(sorted_active(&r), vec![0, 1, 2, 3, 4]);
}

#[test]
fn set_data_twice_matches_once() {
    let mut once = recycler();
    once.set_data(Some(rows(10)));
    once.set_window(-2, 5);
    once.update_items();
    once.set_data(Some(rows(10)));

    let mut twice = recycler();
    twice.set_data(Some(rows(10)));
    twice.set_window(-2, 5);
    twice.update_items();
    twice.set_data(Some(rows(10)));
    twice.set_data(Some(rows(10)));

    assert_eq!(once.active_len(), twice.active_len());
    assert_eq!(once.parked_total(), twice.parked_total());
    assert_eq!(once.instance_count(), twice.instance_count());
    assert_eq!(once.data_offset(), twice.data_offset());
    assert_eq!(twice.data_offset(), 0);
    assert_eq!(twice.active_len(), 0);
}

#[test]
fn clearing_data_yields_empty_passes() {
    let mut r = recycler();
    r.set_data(Some(rows(4)));
    r.set_window(0, 5);
    r.update_items();

    r.set_data(None);
    assert_eq!(r.data_len(), 0);
    let stats = r.update_items();
    assert_eq!(stats, PassStats::default());
    assert_eq!(r.parked_total(), 4);
}

#[test]
fn unknown_template_is_skipped_without_mutation() {
    let mut r = recycler();
    let mut data = rows(3);
    data.push(row(3, "missing"));
    r.set_data(Some(data));

    assert_eq!(r.acquire_at(3), Err(RecycleError::UnknownTemplate));
    assert_eq!(r.active_len(), 0);
    assert_eq!(r.parked_total(), 0);
    assert_eq!(r.instance_count(), 0);

    r.set_window(0, 5);
    let stats = r.update_items();
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.positioned, 3);
    assert_eq!(sorted_active(&r), vec![0, 1, 2]);
    assert_disjoint(&r);
}

#[test]
fn missing_entry_is_reported() {
    let mut r = recycler();
    assert_eq!(
        r.acquire_at(0),
        Err(RecycleError::MissingEntry { position: 0 })
    );

    r.set_data(Some(rows(3)));
    assert_eq!(
        r.acquire_at(7),
        Err(RecycleError::MissingEntry { position: 7 })
    );
    assert_eq!(r.instance_count(), 0);
}

#[test]
fn released_instance_is_rebound_instead_of_instantiated() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);
    r.update_items();

    let id_3 = r.item_id(&3).unwrap();
    assert!(r.release(&3));
    assert!(!r.release(&3));
    assert_eq!(r.location(id_3), Some(ItemLocation::Parked));
    assert!(!r.item(id_3).unwrap().active);

    let id_7 = r.acquire_at(7).unwrap();

    assert_eq!(id_7, id_3);
    assert_eq!(r.host().instantiated, 5);
    let item = r.item(id_7).unwrap();
    assert_eq!(item.bound, Some(7));
    assert_eq!(item.label, "7");
    assert_eq!(item.setups, 2);
    assert!(item.active);
    assert_eq!(r.location(id_7), Some(ItemLocation::Active(7)));
    assert_disjoint(&r);
}

#[test]
fn acquiring_a_bound_index_returns_the_same_instance() {
    let mut r = recycler();
    r.set_data(Some(rows(3)));
    let a = r.acquire_at(1).unwrap();
    let b = r.acquire_at(1).unwrap();
    assert_eq!(a, b);
    assert_eq!(r.instance_count(), 1);
    assert_eq!(r.item(a).unwrap().setups, 1);
}

#[test]
fn pool_order_is_configurable() {
    for (order, expected_from) in [(PoolOrder::Fifo, 0u32), (PoolOrder::Lifo, 2u32)] {
        let mut r = recycler_with(RecyclerOptions::new().with_pool_order(order));
        r.set_data(Some(rows(10)));
        r.set_window(0, 5);
        r.update_items();

        let expected = serial_of(&r, expected_from).unwrap();
        r.release(&0);
        r.release(&1);
        r.release(&2);

        let id = r.acquire_at(8).unwrap();
        assert_eq!(r.item(id).unwrap().serial, expected, "{order:?}");
    }
}

#[test]
fn pools_are_per_template() {
    let mut r = recycler();
    let data = vec![row(0, "header"), row(1, "row"), row(2, "row"), row(3, "header")];
    r.set_data(Some(data));
    r.set_window(0, 2);
    r.update_items();
    assert_eq!(sorted_active(&r), vec![0, 1]);

    r.set_data_offset(-3);
    let stats = r.update_items();

    // Row 2 reuses row 1's instance, header 3 reuses header 0's.
    assert_eq!(stats.reused, 2);
    assert_eq!(stats.instantiated, 0);
    assert_eq!(r.list_item(&2).unwrap().template, "row");
    assert_eq!(r.list_item(&3).unwrap().template, "header");
    assert_disjoint(&r);
}

#[test]
fn replacing_a_prototype_keeps_parked_instances() {
    let mut r = recycler();
    r.set_data(Some(rows(3)));
    r.set_window(0, 5);
    r.update_items();
    r.set_data(None);
    assert_eq!(r.parked_len(&"row"), 3);

    assert_eq!(r.register_template("row", "row"), Some("row"));
    assert_eq!(r.parked_len(&"row"), 3);
    assert!(r.has_template(&"header"));
    assert!(!r.has_template(&"footer"));
}

#[test]
fn drain_pool_hands_out_parked_instances() {
    let mut r = recycler();
    r.set_data(Some(rows(4)));
    r.set_window(0, 5);
    r.update_items();
    let id = r.item_id(&0).unwrap();
    r.set_data(Some(rows(4)));

    let drained = r.drain_pool(&"row");

    assert_eq!(drained.len(), 4);
    assert!(drained.iter().all(|w| !w.active));
    assert_eq!(r.instance_count(), 0);
    assert_eq!(r.item(id).map(|w| w.serial), None);
    assert_eq!(r.location(id), None);

    let stats = r.update_items();
    assert_eq!(stats.instantiated, 4);
    assert!(r.drain_pool(&"footer").is_empty());
}

#[test]
fn settling_ends_on_first_untouched_pass() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);

    r.start_settling();
    r.start_settling();
    assert!(r.is_settling());

    let first = r.update_items();
    assert!(!first.settled);
    assert!(r.is_settling());

    let second = r.update_items();
    assert!(second.settled);
    assert_eq!(r.settle_state(), SettleState::Idle);

    let third = r.update_items();
    assert!(!third.settled);
    assert_eq!(r.settle_state(), SettleState::Idle);
}

#[test]
fn moving_placements_keep_the_list_settling() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);
    r.update_items();

    r.host_mut().moving_budget = 12;
    r.start_settling();

    let mut passes = 0;
    while r.is_settling() {
        let stats = r.update_items();
        passes += 1;
        assert!(passes < 10, "settling never converged");
        if stats.moving > 0 {
            assert!(!stats.settled);
        }
    }
    // 12 moving placements over 5 rows span three passes; the fourth is untouched.
    assert_eq!(passes, 4);
}

#[test]
fn release_counts_only_under_any_work_policy() {
    for (policy, settles_immediately) in [
        (SettlePolicy::AcquireOrMotion, true),
        (SettlePolicy::AnyWork, false),
    ] {
        let mut r = recycler_with(RecyclerOptions::new().with_settle_policy(policy));
        r.set_data(Some(rows(10)));
        r.set_window(0, 5);
        r.update_items();

        r.start_settling();
        r.set_num_rows(3);
        let stats = r.update_items();
        assert_eq!(stats.released, 2);
        assert_eq!(stats.acquired, 0);
        assert_eq!(stats.settled, settles_immediately, "{policy:?}");

        r.update_items();
        assert!(!r.is_settling(), "{policy:?}");
    }
}

#[test]
fn signal_motion_carries_into_the_next_pass() {
    let mut r = recycler();
    r.set_data(Some(rows(3)));
    r.set_window(0, 5);
    r.update_items();

    r.start_settling();
    r.signal_motion();
    assert!(!r.update_items().settled);
    assert!(r.update_items().settled);
}

#[test]
fn hooks_can_signal_motion_during_a_pass() {
    let mut r = recycler();
    r.set_data(Some(rows(3)));
    r.set_window(0, 5);
    r.update_items();

    r.host_mut().signal_via_hooks = true;
    r.start_settling();
    assert!(!r.update_items().settled);
    assert!(!r.update_items().settled);

    r.host_mut().signal_via_hooks = false;
    assert!(r.update_items().settled);
}

#[test]
fn settle_callback_sees_each_transition_once() {
    let transitions = Rc::new(RefCell::new(Vec::new()));
    let options = RecyclerOptions::new().with_on_settle_change(Some({
        let transitions = Rc::clone(&transitions);
        move |state: SettleState| transitions.borrow_mut().push(state)
    }));
    let mut r = recycler_with(options);
    r.set_data(Some(rows(2)));
    r.set_window(0, 5);

    r.start_settling();
    r.start_settling();
    r.update_items();
    r.update_items();
    r.update_items();
    r.end_settling();

    assert_eq!(
        *transitions.borrow(),
        vec![SettleState::Settling, SettleState::Idle]
    );
}

#[test]
fn grab_round_trip() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);
    r.update_items();

    r.set_row_grabbed(2, Ray(1), true);
    assert_eq!(r.grabbed_row(&Ray(1)).map(|w| w.serial), serial_of(&r, 2));
    assert_eq!(r.grabbed_row(&Ray(2)).map(|w| w.serial), None);

    r.set_row_grabbed(2, Ray(1), false);
    assert_eq!(r.grabbed_row(&Ray(1)).map(|w| w.serial), None);
    assert_eq!(r.grab_count(), 0);
}

#[test]
fn regrabbing_moves_the_handle() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);
    r.update_items();

    r.set_row_grabbed(1, Ray(1), true);
    r.set_row_grabbed(3, Ray(1), true);
    assert_eq!(r.grab_count(), 1);
    assert_eq!(r.grabbed_index(&Ray(1)), Some(3));
    assert_eq!(r.grabbed_row(&Ray(1)).map(|w| w.serial), serial_of(&r, 3));

    // The grab survives the row scrolling away; the lookup just finds no instance.
    r.set_data_offset(-6);
    r.update_items();
    assert_eq!(r.grabbed_index(&Ray(1)), Some(3));
    assert_eq!(r.grabbed_row(&Ray(1)).map(|w| w.serial), None);
}

#[test]
fn items_call_back_through_hooks() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);
    r.update_items();

    let hooks = r.list_item(&1).and_then(|w| w.hooks.clone()).unwrap();
    assert!(hooks.is_attached());
    assert_eq!(hooks.list_item(&3), r.item_id(&3));
    assert_eq!(hooks.list_item(&9), None);

    hooks.start_settling();
    assert!(r.is_settling());
    assert_eq!(hooks.settle_state(), SettleState::Settling);
    hooks.end_settling();
    assert!(!r.is_settling());

    hooks.set_row_grabbed(4, Ray(7), true);
    assert_eq!(r.grabbed_index(&Ray(7)), Some(4));
    assert_eq!(hooks.grabbed_row(&Ray(7)), r.item_id(&4));
    assert_eq!(hooks.grabbed_index(&Ray(7)), Some(4));

    drop(r);
    assert!(!hooks.is_attached());
    assert_eq!(hooks.list_item(&3), None);
    assert_eq!(hooks.settle_state(), SettleState::Idle);
    hooks.start_settling();
}

#[test]
fn reused_items_get_fresh_hooks() {
    let mut r = recycler();
    r.set_data(Some(rows(10)));
    r.set_window(0, 5);
    r.update_items();
    r.release(&0);
    let id = r.acquire_at(9).unwrap();

    let hooks = r.item(id).and_then(|w| w.hooks.clone()).unwrap();
    assert_eq!(hooks.list_item(&9), Some(id));
    assert!(r.item(id).unwrap().connected);
    assert_eq!(r.host().connected, 5);
}

#[test]
fn randomized_passes_preserve_invariants() {
    let mut rng = Lcg::new(0x5eed_1234);
    let mut r = recycler();

    for step in 0..400 {
        match rng.gen_range_usize(0, 8) {
            0 => {
                let n = rng.gen_range_u64(0, 40) as u32;
                let data = (0..n)
                    .map(|i| row(i, if i % 5 == 0 { "header" } else { "row" }))
                    .collect();
                r.set_data(Some(data));
                assert_eq!(r.active_len(), 0);
                assert_eq!(r.data_offset(), 0);
            }
            1 => {
                let len = r.data_len() as i64;
                r.set_data_offset(rng.gen_range_i64(-len - 2, 4));
            }
            2 => r.set_num_rows(rng.gen_range_usize(0, 12)),
            3 => {
                let len = r.data_len().max(1);
                let _ = r.acquire_at(rng.gen_range_usize(0, len + 2));
            }
            4 => {
                r.release(&(rng.gen_range_u64(0, 40) as u32));
            }
            5 => r.start_settling(),
            _ => {
                r.update_items();
                assert_visibility(&r);
            }
        }
        assert_disjoint(&r);
        assert!(r.active_len() <= r.data_len(), "step {step}");
    }

    // Static dataset and offset: settling converges and stays idle.
    r.start_settling();
    r.update_items();
    r.update_items();
    assert_eq!(r.settle_state(), SettleState::Idle);
    r.update_items();
    assert_eq!(r.settle_state(), SettleState::Idle);
}

#[test]
fn visible_window_bounds() {
    let w = VisibleWindow::new(5, 1, 0);
    assert_eq!(w, VisibleWindow { first: -1, last: 4 });
    assert!(w.contains(-1));
    assert!(!w.contains(-2));
    assert!(w.contains(4));
    assert!(!w.contains(5));

    let empty = VisibleWindow::new(0, 0, 0);
    assert!(empty.is_empty());
}

// Grab handles only need equality; they are moved in and compared, never copied.
#[derive(Debug, PartialEq)]
struct Pointer(u8);

struct Plain(Option<u32>);

impl ListItem<Row, Pointer> for Plain {
    fn setup(&mut self, data: &Row) {
        self.0 = Some(data.index);
    }
}

struct PointerHost;

impl ItemHost<Row> for PointerHost {
    type Prototype = ();
    type Handle = Pointer;
    type Item = Plain;

    fn instantiate(&mut self, _prototype: &()) -> Plain {
        Plain(None)
    }

    fn position(&mut self, _item: &mut Plain, _visible_offset: usize) -> Placement {
        Placement::Settled
    }
}

#[test]
fn grabs_work_with_handles_that_are_not_clone() {
    let mut r = Recycler::new(PointerHost, RecyclerOptions::default());
    r.register_template("row", ());
    r.set_data(Some(rows(6)));
    r.set_window(0, 4);
    r.update_items();

    r.set_row_grabbed(1, Pointer(7), true);
    assert_eq!(r.grabbed_row(&Pointer(7)).and_then(|p| p.0), Some(1));
    r.set_row_grabbed(2, Pointer(7), true);
    assert_eq!(r.grabbed_index(&Pointer(7)), Some(2));
    assert_eq!(r.grab_count(), 1);

    r.set_row_grabbed(2, Pointer(7), false);
    assert_eq!(r.grabbed_row(&Pointer(7)).map(|p| p.0), None);
}
