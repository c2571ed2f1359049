/// Village Elder demo — a code-authored dialogue graph played by a
/// scripted player, printing each beat.
///
/// Run with: cargo run --example village_elder

use npc_dialogue::core::display::HeadlessDisplay;
use npc_dialogue::core::proximity::{ActorKind, PlayerTracker};
use npc_dialogue::core::scene::SceneQueue;
use npc_dialogue::core::score::{ScoreKeeper, Scoreboard};
use npc_dialogue::core::session::{DialogueSession, Host, Step};
use npc_dialogue::schema::graph::{DialogueGraph, NodeSpec, OptionSpec};

fn main() {
    env_logger::init();

    let graph = DialogueGraph::builder("Elder Soon-ja")
        .start("greeting")
        .node(
            NodeSpec::new("greeting", "Ah, the new courier. You took your time.")
                .portrait("elder_squint")
                .option(OptionSpec::to("Sorry, the bridge was out.", "bridge").score(1))
                .option(OptionSpec::to("I came as fast as I could.", "impatient").score(-1))
                .option(OptionSpec::end("I'll come back later.")),
        )
        .node(
            NodeSpec::new("bridge", "The bridge? Again? Then the letter is more urgent than I thought.")
                .portrait("elder_worried")
                .option(OptionSpec::to("What letter?", "letter"))
                .option(OptionSpec::to("Can I help with the bridge?", "volunteer").score(2)),
        )
        .node(
            NodeSpec::new("impatient", "Fast? The snails were faster.")
                .option(OptionSpec::to("Fair. The bridge was out.", "bridge"))
                .option(OptionSpec::end("Goodbye, then.").score(-1)),
        )
        .node(
            NodeSpec::new("letter", "Take this to the gatekeeper in town. Go now.")
                .portrait("elder_smile")
                .next_scene("Town"),
        )
        .node(
            NodeSpec::new("volunteer", "Kind of you. First, the letter.")
                .option(OptionSpec::to("Of course.", "letter").score(1)),
        )
        .build()
        .expect("Failed to build dialogue graph");

    let mut display = HeadlessDisplay::new(3);
    let mut score = Scoreboard::new();
    let mut scenes = SceneQueue::new();
    let mut session = DialogueSession::new(&graph);

    // The player walks up from a distance.
    let mut tracker = PlayerTracker::new((10.0, 4.0)).with_player((2.0, 4.0));
    let frame = 1.0 / 60.0;
    while !session.player_in_range() {
        tracker.player = tracker.player.map(|(x, y)| (x + 0.1, y));
        let mut host = Host::new(&mut display, &mut score, &mut scenes);
        session.tick(frame, Some(&tracker), &mut host);
    }
    println!("Player reached the elder at {:?}\n", tracker.player);

    // Pressing the interact key; the trigger path works the same way.
    session.on_trigger_enter(ActorKind::Player);
    let mut host = Host::new(&mut display, &mut score, &mut scenes);
    session.interact(&mut host);
    print_beat(&display);

    for choice in [0usize, 1, 0] {
        let mut host = Host::new(&mut display, &mut score, &mut scenes);
        let picked = display_label(&session, choice);
        let step = session.click_slot(choice, &mut host);
        println!("> {}", picked);
        match step {
            Step::Advanced(_) => print_beat(&display),
            Step::SceneRequested(scene) => {
                println!("\n--- {} (loading scene '{}') ---", display.text, scene);
                break;
            }
            Step::Ended => {
                println!("\n--- conversation over ---");
                break;
            }
            Step::Ignored => {}
        }
    }

    println!("\nFinal score: {}", score.get());
    println!("Pending scenes: {:?}", scenes.drain());
}

fn display_label(session: &DialogueSession<'_>, slot: usize) -> String {
    session
        .slots()
        .option_for(slot)
        .and_then(|i| session.current_node().and_then(|n| n.options.get(i)))
        .map(|o| o.text.clone())
        .unwrap_or_default()
}

fn print_beat(display: &HeadlessDisplay) {
    println!(
        "\n[{} | {}]",
        display.speaker,
        display.portrait.as_deref().unwrap_or("-")
    );
    println!("  {}", display.text);
    for (slot, label) in display.visible_slots() {
        println!("  {}) {}", slot, label);
    }
}
