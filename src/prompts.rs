use rand::seq::SliceRandom;
use rand::Rng;

/// Built-in practice prompts so the binary runs without external
/// content. Lesson/game text normally arrives from the host data layer.
const PRACTICE_PROMPTS: &[&str] = &[
    "the quick brown fox jumps over the lazy dog",
    "pack my box with five dozen liquor jugs",
    "sphinx of black quartz judge my vow",
    "how vexingly quick daft zebras jump",
    "the five boxing wizards jump quickly",
    "bright vixens jump while dozy fowl quack",
    "jackdaws love my big sphinx of quartz",
    "a wizard's job is to vex chumps quickly in fog",
];

pub fn pick_prompt<R: Rng>(rng: &mut R) -> &'static str {
    PRACTICE_PROMPTS
        .choose(rng)
        .copied()
        .unwrap_or(PRACTICE_PROMPTS[0])
}
