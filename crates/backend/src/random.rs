//! Random payload generators behind `/random/{format}`.
//!
//! All generators take the RNG as a parameter so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use shared_types::RandomFormat;
use uuid::Uuid;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Frances", "Edsger",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Torvalds", "Hamilton", "Ritchie", "Liskov", "Thompson",
    "Allen", "Dijkstra",
];
const TAGS: &[&str] = &[
    "admin", "beta", "trial", "premium", "staff", "guest", "verified", "legacy",
];
const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua",
];

#[derive(Debug, Clone, Serialize)]
pub struct RandomPerson {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: u8,
    pub active: bool,
    pub tags: Vec<String>,
}

pub fn person<R: Rng + ?Sized>(rng: &mut R) -> RandomPerson {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Lovelace");
    let tag_count = rng.gen_range(1..=3);
    let tags = TAGS
        .choose_multiple(rng, tag_count)
        .map(|t| t.to_string())
        .collect();

    RandomPerson {
        id: Uuid::from_u128(rng.gen()),
        name: format!("{} {}", first, last),
        email: format!(
            "{}.{}{}@example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            rng.gen_range(1..1000)
        ),
        age: rng.gen_range(18..=90),
        active: rng.gen_bool(0.8),
        tags,
    }
}

fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(6..=14);
    let words: Vec<&str> = (0..len)
        .filter_map(|_| WORDS.choose(&mut *rng).copied())
        .collect();
    let mut text = words.join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

pub fn plaintext<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(3..=6);
    let sentences: Vec<String> = (0..count).map(|_| sentence(&mut *rng)).collect();
    sentences.join(" ")
}

pub fn json<R: Rng + ?Sized>(rng: &mut R) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&person(rng))
}

pub fn xml<R: Rng + ?Sized>(rng: &mut R) -> String {
    let p = person(rng);
    let tags: String = p
        .tags
        .iter()
        .map(|t| format!("    <tag>{}</tag>\n", t))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <person id=\"{}\">\n  \
         <name>{}</name>\n  \
         <email>{}</email>\n  \
         <age>{}</age>\n  \
         <active>{}</active>\n  \
         <tags>\n{}  </tags>\n\
         </person>\n",
        p.id, p.name, p.email, p.age, p.active, tags
    )
}

pub fn html<R: Rng + ?Sized>(rng: &mut R) -> String {
    let p = person(rng);
    let paragraphs: String = (0..rng.gen_range(2..=4))
        .map(|_| format!("    <p>{}</p>\n", sentence(&mut *rng)))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>{name}</title>\n  </head>\n  \
         <body>\n    <h1>{name}</h1>\n{paragraphs}  </body>\n</html>\n",
        name = p.name,
        paragraphs = paragraphs
    )
}

/// Render one payload in `format`.
pub fn generate<R: Rng + ?Sized>(format: RandomFormat, rng: &mut R) -> serde_json::Result<String> {
    Ok(match format {
        RandomFormat::Json => json(rng)?,
        RandomFormat::Xml => xml(rng),
        RandomFormat::Plaintext => plaintext(rng),
        RandomFormat::Html => html(rng),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_output_is_deterministic() {
        let a = person(&mut StdRng::seed_from_u64(7));
        let b = person(&mut StdRng::seed_from_u64(7));
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn test_person_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let p = person(&mut rng);
            assert!((18..=90).contains(&p.age));
            assert!((1..=3).contains(&p.tags.len()));
            assert!(p.email.ends_with("@example.com"));
        }
    }

    #[test]
    fn test_json_parses() {
        let body = json(&mut StdRng::seed_from_u64(1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(value.get("id").is_some());
        assert!(value.get("tags").unwrap().is_array());
    }

    #[test]
    fn test_markup_shapes() {
        let mut rng = StdRng::seed_from_u64(3);
        let doc = xml(&mut rng);
        assert!(doc.starts_with("<?xml"));
        assert!(doc.trim_end().ends_with("</person>"));

        let page = html(&mut rng);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1>"));
    }

    #[test]
    fn test_plaintext_sentences() {
        let text = plaintext(&mut StdRng::seed_from_u64(9));
        assert!(text.ends_with('.'));
        assert!(text.chars().next().unwrap().is_ascii_uppercase());
    }
}
