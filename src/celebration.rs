use rand::seq::SliceRandom;
use rand::Rng;

/// Colour family of a celebration banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CelebrationTone {
    S,
    A,
    B,
    Best,
}

/// Transient banner shown after a good attempt or when focus mode turns on
#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub title: String,
    pub subtitle: String,
    pub tone: CelebrationTone,
}

impl Celebration {
    pub fn new(title: &str, subtitle: impl Into<String>, tone: CelebrationTone) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.into(),
            tone,
        }
    }

    pub fn new_best(difference_secs: f64) -> Self {
        Self::new(
            "New best!",
            format!("±{difference_secs:.3}s"),
            CelebrationTone::Best,
        )
    }

    pub fn focus_mode() -> Self {
        Self::new(
            "Focus mode",
            "The readout is hidden. Aim by feel.",
            CelebrationTone::A,
        )
    }
}

const GRAVITY: f64 = 15.0;
const OFFSCREEN_BUFFER: f64 = 5.0;

/// A single spark thrown out by a burst
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub age: f64,
    pub max_age: f64,
}

impl Spark {
    fn new<R: Rng + ?Sized>(x: f64, y: f64, tone: CelebrationTone, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *symbols_for(tone).choose(rng).unwrap_or(&'*'),
            age: 0.0,
            max_age: rng.gen_range(0.8..1.6),
        }
    }

    fn step(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }
}

fn symbols_for(tone: CelebrationTone) -> &'static [char] {
    match tone {
        CelebrationTone::S => &['★', '✦', '✧', '*'],
        CelebrationTone::A => &['✦', '·', '+'],
        CelebrationTone::B => &['+', '·'],
        CelebrationTone::Best => &['★', '♦', '✦', '+', '*'],
    }
}

fn spark_count(tone: CelebrationTone) -> usize {
    match tone {
        CelebrationTone::S | CelebrationTone::Best => 24,
        CelebrationTone::A => 14,
        CelebrationTone::B => 8,
    }
}

/// Decorative spark shower behind a celebration banner, advanced once per frame
#[derive(Debug, Default)]
pub struct Burst {
    pub sparks: Vec<Spark>,
    pub tone: Option<CelebrationTone>,
    width: f64,
    height: f64,
}

impl Burst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.sparks.is_empty()
    }

    /// Throw a fresh set of sparks from the centre of a `width` x `height` area,
    /// replacing any sparks still in flight.
    pub fn ignite<R: Rng + ?Sized>(
        &mut self,
        tone: CelebrationTone,
        width: u16,
        height: u16,
        rng: &mut R,
    ) {
        self.width = f64::from(width);
        self.height = f64::from(height);
        self.tone = Some(tone);
        self.sparks.clear();

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        for _ in 0..spark_count(tone) {
            let x = center_x + rng.gen_range(-12.0..12.0);
            let y = center_y + rng.gen_range(-3.0..3.0);
            self.sparks.push(Spark::new(x, y, tone, rng));
        }
    }

    pub fn extinguish(&mut self) {
        self.sparks.clear();
        self.tone = None;
    }

    pub fn step(&mut self, dt: f64) {
        let (width, height) = (self.width, self.height);
        self.sparks.retain_mut(|spark| {
            let alive = spark.step(dt);
            let off_screen = spark.y > height + OFFSCREEN_BUFFER
                || spark.x < -OFFSCREEN_BUFFER
                || spark.x > width + OFFSCREEN_BUFFER;
            alive && !off_screen
        });
        if self.sparks.is_empty() {
            self.tone = None;
        }
    }
}
