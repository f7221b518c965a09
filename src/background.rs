//! Decorative scrolling poster wall. Static data only; nothing here talks to the catalog.

use serde::Serialize;

use crate::links::{image_url, ImageSize};

const COLUMN_POSTERS: [[&str; 5]; 6] = [
    [
        "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
        "/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
        "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
        "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
        "/sF1U4EUQS8YHUYjNl3pMGNIQyr0.jpg",
    ],
    [
        "/6oom5QYQ2yQTMJIbnvbkBL9cHo6.jpg",
        "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
        "/aKuFiU82s5ISJpGZp7YkIr3kCUd.jpg",
        "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
    ],
    [
        "/6yoghtyTpznpBik8EngEmJskVUO.jpg",
        "/rplLJ2hPcOQmkFhTqUte0MkEaO2.jpg",
        "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
        "/7IiTTgloJzvGI1TAYymCfbfl3vT.jpg",
        "/ty8TGRuvJLPUmAR1H1nRIsgwvim.jpg",
    ],
    [
        "/bdN3gXuYP8qNxh5U0870A55xBDg.jpg",
        "/nMKdUUepR0i5zn0y1T4CsSB5chy.jpg",
        "/6uSPcdGMY5qPVpgsmcPXRoHxG8c.jpg",
        "/39wmItIWsg5sZMyRUHLkWBcuVCM.jpg",
        "/5K7cOHoay2mZusSLezBOY0Qxh8a.jpg",
    ],
    [
        "/vFJ74JL7XtX7zYsmmVP5EsXXxHh.jpg",
        "/saHP97rTPS5eLmrLQEcANmKrsFl.jpg",
        "/hek3koDUyRQk7FIhPXsa6mT2Zc3.jpg",
        "/5KCVkau1HEl7ZzfPsKAPM0sMiKc.jpg",
        "/velWPhVMQeQKcxggNEU8YmIo52R.jpg",
    ],
    [
        "/fIE3lAGcZDV1G6XM5KmuWnNsPp1.jpg",
        "/bXNvzjULc9jrOVhGfjcc64uKZmZ.jpg",
        "/1QpO9wo7JWecZ4NiBuu625FiY1j.jpg",
        "/ygGmAO60t8GyqUo9xYeYxSZAR3b.jpg",
        "/Ab8mkHmkYADjU7wQiOkia9BzGvS.jpg",
    ],
];

const BASE_DURATION_SECS: u32 = 40;
const DURATION_STEP_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Down,
    Up,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PosterColumn {
    pub direction: ScrollDirection,
    pub duration_secs: u32,
    /// The column's posters twice over, so the loop has no visible seam.
    pub posters: Vec<String>,
}

pub fn poster_columns() -> Vec<PosterColumn> {
    COLUMN_POSTERS
        .iter()
        .enumerate()
        .map(|(i, paths)| {
            let urls: Vec<String> = paths.iter().map(|p| image_url(ImageSize::W500, p)).collect();
            PosterColumn {
                direction: if i % 2 == 0 {
                    ScrollDirection::Down
                } else {
                    ScrollDirection::Up
                },
                duration_secs: BASE_DURATION_SECS + DURATION_STEP_SECS * i as u32,
                posters: urls.iter().chain(urls.iter()).cloned().collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_alternating_columns() {
        let columns = poster_columns();
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[0].direction, ScrollDirection::Down);
        assert_eq!(columns[1].direction, ScrollDirection::Up);
        assert_eq!(columns[0].duration_secs, 40);
        assert_eq!(columns[5].duration_secs, 65);
    }

    #[test]
    fn posters_are_doubled_for_the_loop() {
        for column in poster_columns() {
            assert_eq!(column.posters.len(), 10);
            assert_eq!(column.posters[..5], column.posters[5..]);
            assert!(column.posters[0].starts_with("https://image.tmdb.org/t/p/w500/"));
        }
    }
}
