use super::core::{ContentItem, ResearchEntry, Snippet, TemplateStore};
use crate::error::Result;

pub const IDEA_CATEGORIES: &[&str] = &["tech", "business", "creative", "social", "health", "education"];

/// Category key of the single research pool.
pub const RESEARCH_POOL: &str = "papers";

pub const CODE_LANGUAGES: &[&str] = &["rust", "python", "typescript", "go"];

const TECH_IDEAS: [&str; 8] = [
    "A browser extension that summarizes long pull requests into a three-line changelog",
    "A CLI that watches a repository and suggests commit messages from staged diffs",
    "A home dashboard that predicts when houseplants need water from soil sensor data",
    "A tool that turns whiteboard photos into editable architecture diagrams",
    "A privacy-first password manager that syncs over local Wi-Fi only",
    "A terminal app that visualizes network latency to every service you depend on",
    "A keyboard firmware configurator that learns your most common shortcuts",
    "A static site generator that publishes straight from a notes folder",
];

const BUSINESS_IDEAS: [&str; 8] = [
    "A subscription box for small-batch hot sauces from independent producers",
    "A marketplace connecting retired engineers with startups for one-hour reviews",
    "A shared commercial kitchen booked by the hour through a mobile app",
    "A bookkeeping service priced per receipt instead of per month",
    "A rental platform for professional camera gear between local creators",
    "A co-working space designed for parents with on-site childcare",
    "A consultancy that audits software licenses to cut SaaS spend",
    "A repair cafe franchise with a membership tier for free fixes",
];

const CREATIVE_IDEAS: [&str; 8] = [
    "A short film told entirely through a single family's voicemail messages",
    "A board game where players build a city that floods every third round",
    "A photo series pairing strangers' hands with the tools of their trade",
    "An album recorded in one take inside an empty parking garage",
    "A comic about a lighthouse keeper who collects messages in bottles",
    "A mural that changes appearance under ultraviolet light at night",
    "A podcast interviewing the oldest resident of every town on a road trip",
    "An interactive novel where readers vote on the weather each chapter",
];

const SOCIAL_IDEAS: [&str; 8] = [
    "A neighborhood tool library run out of a converted shipping container",
    "A language exchange that pairs newcomers with long-time residents",
    "A meal-sharing app for cooks with leftovers and neighbors in need",
    "A volunteer network that teaches seniors to spot online scams",
    "A community fridge map with live stock updates from volunteers",
    "A mentoring circle for first-generation university students",
    "A free repair day where local mechanics fix bikes for kids",
    "A walking group that documents broken sidewalks for the city council",
];

const HEALTH_IDEAS: [&str; 8] = [
    "A habit tracker that nudges you to stand based on calendar gaps",
    "A hydration bottle lid that glows when you fall behind your goal",
    "A guided stretching routine generated from your day's step count",
    "A sleep journal that correlates screen time with rest quality",
    "A meal planner built around what is already in your fridge",
    "A posture reminder that uses your laptop camera without storing video",
    "A breathing exercise timer synced to calming ambient music",
    "A medication reminder that escalates to a family member when missed",
];

const EDUCATION_IDEAS: [&str; 8] = [
    "A flashcard app that schedules reviews around your commute",
    "A math tutor that explains mistakes with hand-drawn style sketches",
    "A coding course where every lesson ships a tiny real project",
    "A history timeline built collaboratively by an entire classroom",
    "A vocabulary game that uses words from the book you are reading",
    "A science kit subscription with experiments from everyday materials",
    "A peer review platform for student essays with rubric hints",
    "A language podcast that slows down in real time when you rewind",
];

/// (title, summary, source, year)
const RESEARCH_ENTRIES: [(&str, &str, &str, u16); 12] = [
    (
        "Attention Patterns in Long-Context Language Models",
        "Examines how attention heads distribute focus over documents longer than 32k tokens.",
        "Journal of Machine Learning Research",
        2023,
    ),
    (
        "Urban Heat Islands and Tree Canopy Coverage",
        "Correlates street-level temperature with canopy density across forty cities.",
        "Nature Cities",
        2022,
    ),
    (
        "Spaced Repetition in Adult Language Acquisition",
        "A longitudinal study of review intervals and retention in adult learners.",
        "Applied Linguistics",
        2021,
    ),
    (
        "Energy Use of Idle Cloud Workloads",
        "Quantifies power drawn by over-provisioned virtual machines in public clouds.",
        "ACM SIGMETRICS",
        2023,
    ),
    (
        "Microplastics in Freshwater Food Webs",
        "Tracks plastic particle accumulation from plankton to predatory fish.",
        "Environmental Science & Technology",
        2020,
    ),
    (
        "Remote Work and Team Communication Networks",
        "Analyzes message graphs before and after a company-wide shift to remote work.",
        "Nature Human Behaviour",
        2021,
    ),
    (
        "Memory Safety Bugs in Systems Software",
        "Categorizes a decade of security advisories by root cause and language.",
        "IEEE Security & Privacy",
        2022,
    ),
    (
        "Gut Microbiome Diversity and Sleep Quality",
        "Reports associations between microbial diversity and measured sleep efficiency.",
        "PLOS ONE",
        2019,
    ),
    (
        "Battery Degradation in Electric Buses",
        "Models capacity fade under real route profiles and charging schedules.",
        "Journal of Power Sources",
        2023,
    ),
    (
        "Gamification Effects on Online Course Completion",
        "Meta-analysis of badges, streaks and leaderboards in MOOCs.",
        "Computers & Education",
        2020,
    ),
    (
        "Soil Carbon Recovery After Cover Cropping",
        "Measures carbon stock changes over eight seasons of cover crop rotation.",
        "Agriculture, Ecosystems & Environment",
        2022,
    ),
    (
        "Latency Perception in Interactive Interfaces",
        "User study on the delay threshold at which interface responses feel sluggish.",
        "CHI Conference Proceedings",
        2021,
    ),
];

/// (language, title, description, body)
const SNIPPETS: [(&str, &str, &str, &str); 12] = [
    (
        "rust",
        "Read a file to string",
        "Reads an entire UTF-8 file and propagates I/O errors.",
        "use std::fs;\n\nfn read_config(path: &str) -> std::io::Result<String> {\n    fs::read_to_string(path)\n}",
    ),
    (
        "rust",
        "Count words",
        "Counts word frequencies with a HashMap entry API.",
        "use std::collections::HashMap;\n\nfn word_counts(text: &str) -> HashMap<&str, usize> {\n    let mut counts = HashMap::new();\n    for word in text.split_whitespace() {\n        *counts.entry(word).or_insert(0) += 1;\n    }\n    counts\n}",
    ),
    (
        "rust",
        "Spawn worker threads",
        "Spawns workers and joins them, collecting their results.",
        "use std::thread;\n\nfn parallel_squares(inputs: Vec<u64>) -> Vec<u64> {\n    let handles: Vec<_> = inputs\n        .into_iter()\n        .map(|n| thread::spawn(move || n * n))\n        .collect();\n    handles.into_iter().filter_map(|h| h.join().ok()).collect()\n}",
    ),
    (
        "python",
        "Fetch JSON",
        "Downloads and decodes a JSON document with the standard library.",
        "import json\nfrom urllib.request import urlopen\n\ndef fetch_json(url):\n    with urlopen(url) as response:\n        return json.load(response)",
    ),
    (
        "python",
        "Retry decorator",
        "Retries a function a fixed number of times before giving up.",
        "import functools\n\ndef retry(times):\n    def wrap(fn):\n        @functools.wraps(fn)\n        def inner(*args, **kwargs):\n            for attempt in range(times - 1):\n                try:\n                    return fn(*args, **kwargs)\n                except Exception:\n                    pass\n            return fn(*args, **kwargs)\n        return inner\n    return wrap",
    ),
    (
        "python",
        "Chunk a list",
        "Splits a sequence into fixed-size chunks.",
        "def chunks(items, size):\n    return [items[i:i + size] for i in range(0, len(items), size)]",
    ),
    (
        "typescript",
        "Debounce",
        "Delays calls until the input has been quiet for `wait` milliseconds.",
        "export function debounce<T extends unknown[]>(fn: (...args: T) => void, wait: number) {\n  let timer: ReturnType<typeof setTimeout> | undefined;\n  return (...args: T) => {\n    clearTimeout(timer);\n    timer = setTimeout(() => fn(...args), wait);\n  };\n}",
    ),
    (
        "typescript",
        "Typed fetch",
        "Fetches a URL and casts the JSON body to a caller-supplied type.",
        "export async function getJson<T>(url: string): Promise<T> {\n  const res = await fetch(url);\n  if (!res.ok) throw new Error(`HTTP ${res.status}`);\n  return (await res.json()) as T;\n}",
    ),
    (
        "typescript",
        "Group by key",
        "Groups array items by a derived key.",
        "export function groupBy<T, K extends PropertyKey>(items: T[], key: (item: T) => K) {\n  return items.reduce((acc, item) => {\n    (acc[key(item)] ||= []).push(item);\n    return acc;\n  }, {} as Record<K, T[]>);\n}",
    ),
    (
        "go",
        "HTTP health check",
        "Minimal HTTP server exposing a health endpoint.",
        "package main\n\nimport \"net/http\"\n\nfunc main() {\n\thttp.HandleFunc(\"/health\", func(w http.ResponseWriter, r *http.Request) {\n\t\tw.Write([]byte(\"ok\"))\n\t})\n\thttp.ListenAndServe(\":8080\", nil)\n}",
    ),
    (
        "go",
        "Worker pool",
        "Fans jobs out to a fixed number of goroutines.",
        "func pool(jobs <-chan int, results chan<- int, workers int) {\n\tfor w := 0; w < workers; w++ {\n\t\tgo func() {\n\t\t\tfor j := range jobs {\n\t\t\t\tresults <- j * 2\n\t\t\t}\n\t\t}()\n\t}\n}",
    ),
    (
        "go",
        "Reverse a string",
        "Reverses a string rune by rune.",
        "func reverse(s string) string {\n\tr := []rune(s)\n\tfor i, j := 0, len(r)-1; i < j; i, j = i+1, j-1 {\n\t\tr[i], r[j] = r[j], r[i]\n\t}\n\treturn string(r)\n}",
    ),
];

pub fn idea_store() -> Result<TemplateStore> {
    TemplateStore::builder()
        .text_category("tech", TECH_IDEAS)
        .text_category("business", BUSINESS_IDEAS)
        .text_category("creative", CREATIVE_IDEAS)
        .text_category("social", SOCIAL_IDEAS)
        .text_category("health", HEALTH_IDEAS)
        .text_category("education", EDUCATION_IDEAS)
        .build()
}

pub fn research_store() -> Result<TemplateStore> {
    let entries = RESEARCH_ENTRIES
        .iter()
        .enumerate()
        .map(|(idx, (title, summary, source, year))| {
            ContentItem::Research(ResearchEntry {
                id: idx as u32 + 1,
                title: (*title).to_string(),
                summary: (*summary).to_string(),
                source: (*source).to_string(),
                year: *year,
            })
        });
    TemplateStore::builder()
        .category(RESEARCH_POOL, entries)
        .build()
}

pub fn code_store() -> Result<TemplateStore> {
    CODE_LANGUAGES
        .iter()
        .fold(TemplateStore::builder(), |builder, language| {
            let snippets = SNIPPETS
                .iter()
                .filter(|(lang, ..)| lang == language)
                .map(|(lang, title, description, body)| {
                    ContentItem::Snippet(Snippet {
                        title: (*title).to_string(),
                        language: (*lang).to_string(),
                        description: (*description).to_string(),
                        body: (*body).to_string(),
                    })
                });
            builder.category(*language, snippets)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idea_store_has_every_category() {
        let store = idea_store().unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), IDEA_CATEGORIES.to_vec());
        assert_eq!(store.category("tech").unwrap().len(), 8);
    }

    #[test]
    fn research_ids_are_unique() {
        let store = research_store().unwrap();
        let pool = store.category(RESEARCH_POOL).unwrap();
        let mut ids: Vec<u32> = pool
            .items()
            .iter()
            .filter_map(|item| match item {
                ContentItem::Research(entry) => Some(entry.id),
                _ => None,
            })
            .collect();
        assert_eq!(ids.len(), 12);
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn snippets_are_tagged_with_their_category_language() {
        let store = code_store().unwrap();
        for language in CODE_LANGUAGES {
            let category = store.category(language).unwrap();
            assert_eq!(category.len(), 3);
            for item in category.items() {
                match item {
                    ContentItem::Snippet(snippet) => assert_eq!(snippet.language, *language),
                    other => panic!("unexpected item {other:?}"),
                }
            }
        }
    }
}
