use recycler::{ItemData, ItemHost, ListItem, Placement, Recycler, RecyclerOptions};

struct Message {
    id: u64,
    kind: &'static str,
    text: String,
}

impl ItemData for Message {
    type Index = u64;
    type Template = &'static str;

    fn index(&self) -> &u64 {
        &self.id
    }

    fn template(&self) -> &&'static str {
        &self.kind
    }
}

struct Bubble {
    serial: usize,
    text: String,
    y: usize,
}

impl ListItem<Message, ()> for Bubble {
    fn setup(&mut self, data: &Message) {
        self.text = data.text.clone();
    }
}

#[derive(Default)]
struct Screen {
    created: usize,
}

impl ItemHost<Message> for Screen {
    type Prototype = ();
    type Handle = ();
    type Item = Bubble;

    fn instantiate(&mut self, _prototype: &()) -> Bubble {
        self.created += 1;
        Bubble {
            serial: self.created,
            text: String::new(),
            y: 0,
        }
    }

    fn position(&mut self, item: &mut Bubble, visible_offset: usize) -> Placement {
        item.y = visible_offset;
        Placement::Settled
    }
}

fn main() {
    let mut list = Recycler::new(Screen::default(), RecyclerOptions::default());
    list.register_template("message", ());

    let data = (0..1000u64)
        .map(|id| Message {
            id,
            kind: "message",
            text: format!("message #{id}"),
        })
        .collect();
    list.set_data(Some(data));

    // Scroll through the whole list, eight rows at a time.
    for offset in [0i64, -8, -16, -400, -992] {
        list.set_window(offset, 8);
        let stats = list.update_items();
        println!(
            "offset={offset} active={} instances={} acquired={} reused={} released={}",
            list.active_len(),
            list.instance_count(),
            stats.acquired,
            stats.reused,
            stats.released
        );
    }

    list.for_each_active(|id, bubble| {
        println!("#{id} -> bubble {} at row {}: {}", bubble.serial, bubble.y, bubble.text);
    });
    println!("bubbles created: {}", list.host().created);
}
