use skiplist::Config;
use skiplist::SkipMap;

const SAMPLES: usize = 100_000;

fn main() {
    let mut map = SkipMap::with_config(Config::default().seed(1)).expect("default config is valid");
    map.set(5.0, "a");
    map.set(1.0, "b");
    map.set(3.0, "c");
    println!("{:?} (len {})", map, map.len());

    map.remove(&3.0);
    println!("{:?} (len {})", map, map.len());

    // Sampled heights against p^(h-1) * (1-p).
    let mut heights: SkipMap<u64, ()> = SkipMap::with_config(Config::default().seed(2))
        .expect("default config is valid");
    let mut counts = vec![0usize; heights.max_level() + 1];
    for key in 0..SAMPLES as u64 {
        counts[heights.set(key, ()).height()] += 1;
    }

    let p = heights.probability();
    println!("\nheight  observed  expected");
    for (h, &count) in counts.iter().enumerate().skip(1) {
        if count == 0 {
            break;
        }
        let expected = p.powi(h as i32 - 1) * (1.0 - p);
        println!("{:>6}  {:>8.5}  {:>8.5}", h, count as f64 / SAMPLES as f64, expected);
    }
}
