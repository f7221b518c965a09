use serde::Serialize;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W200,
    W500,
    W780,
    W1280,
    Original,
}

impl ImageSize {
    fn token(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        }
    }
}

/// CDN URL for a path fragment as returned by the catalog (leading slash included).
pub fn image_url(size: ImageSize, path: &str) -> String {
    format!("{IMAGE_BASE}/{}{path}", size.token())
}

pub fn image_url_opt(size: ImageSize, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| image_url(size, p))
}

#[derive(Debug, Clone, Copy)]
pub struct StreamingPlatform {
    pub name: &'static str,
    search_prefix: &'static str,
    search_suffix: &'static str,
}

impl StreamingPlatform {
    pub fn search_url(&self, title: &str) -> String {
        format!(
            "{}{}{}",
            self.search_prefix,
            urlencoding::encode(title),
            self.search_suffix
        )
    }
}

pub const STREAMING_PLATFORMS: [StreamingPlatform; 6] = [
    StreamingPlatform {
        name: "Netflix",
        search_prefix: "https://www.netflix.com/search?q=",
        search_suffix: "",
    },
    StreamingPlatform {
        name: "Prime Video",
        search_prefix: "https://www.amazon.com/s?k=",
        search_suffix: "&i=instant-video",
    },
    StreamingPlatform {
        name: "Disney+",
        search_prefix: "https://www.disneyplus.com/search?q=",
        search_suffix: "",
    },
    StreamingPlatform {
        name: "Max",
        search_prefix: "https://www.max.com/search?q=",
        search_suffix: "",
    },
    StreamingPlatform {
        name: "Hulu",
        search_prefix: "https://www.hulu.com/search?q=",
        search_suffix: "",
    },
    StreamingPlatform {
        name: "Apple TV+",
        search_prefix: "https://tv.apple.com/search?term=",
        search_suffix: "",
    },
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchLink {
    pub label: String,
    pub url: String,
}

/// IMDb page, a general "where to watch" search, then one search per platform.
pub fn watch_links(title: &str, imdb_id: Option<&str>) -> Vec<WatchLink> {
    let mut links = Vec::with_capacity(STREAMING_PLATFORMS.len() + 2);
    if let Some(imdb) = imdb_id.filter(|id| !id.is_empty()) {
        links.push(WatchLink {
            label: "IMDb".to_string(),
            url: format!("https://www.imdb.com/title/{imdb}"),
        });
    }
    links.push(WatchLink {
        label: "Find where to watch".to_string(),
        url: format!(
            "https://www.google.com/search?q=watch+{}+movie+online",
            urlencoding::encode(title)
        ),
    });
    links.extend(STREAMING_PLATFORMS.iter().map(|p| WatchLink {
        label: p.name.to_string(),
        url: p.search_url(title),
    }));
    links
}
