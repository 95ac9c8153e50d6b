use recycler::{ItemData, ItemHost, ListItem, Placement, Recycler, RecyclerOptions};
use recycler_adapter::{Controller, Easing, ScrollOptions};

struct Track {
    id: u32,
    title: String,
}

impl ItemData for Track {
    type Index = u32;
    type Template = ();

    fn index(&self) -> &u32 {
        &self.id
    }

    fn template(&self) -> &() {
        &()
    }
}

struct TrackRow {
    title: String,
    y: i64,
}

impl ListItem<Track, ()> for TrackRow {
    fn setup(&mut self, data: &Track) {
        self.title = data.title.clone();
    }
}

struct Host {
    row_size: i64,
}

impl ItemHost<Track> for Host {
    type Prototype = ();
    type Handle = ();
    type Item = TrackRow;

    fn instantiate(&mut self, _prototype: &()) -> TrackRow {
        TrackRow {
            title: String::new(),
            y: 0,
        }
    }

    fn position(&mut self, item: &mut TrackRow, visible_offset: usize) -> Placement {
        item.y = visible_offset as i64 * self.row_size;
        Placement::Settled
    }
}

fn main() {
    let mut list = Recycler::new(Host { row_size: 24 }, RecyclerOptions::default());
    list.register_template((), ());

    let options = ScrollOptions::new(24, 240)
        .with_snap_duration_ms(120)
        .with_easing(Easing::EaseInOutCubic);
    let mut c = Controller::new(list, options);
    c.set_data(Some(
        (0..500)
            .map(|id| Track {
                id,
                title: format!("Track {id:03}"),
            })
            .collect(),
    ));
    c.tick(0);

    // Drag up by a bit more than four and a half rows, then let go.
    c.begin_drag();
    let mut now = 0;
    for _ in 0..6 {
        now += 16;
        c.drag_by(19);
        c.tick(now);
    }
    let target = c.end_drag(now);
    println!("released at offset {}, snapping to {target}", c.scroll().offset());

    while c.is_animating() || c.recycler().is_settling() {
        now += 16;
        let stats = c.tick(now);
        println!(
            "t={now}ms offset={} acquired={} released={} settled={}",
            c.scroll().offset(),
            stats.acquired,
            stats.released,
            stats.settled
        );
    }

    c.recycler().for_each_active(|id, row| {
        println!("#{id}: {} (y={})", row.title, row.y);
    });
}
