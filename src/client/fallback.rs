//! Sample recommendations shown when the service cannot be reached.

use serde::{Deserialize, Serialize};

use super::models::{
    AnimeRecommendation, BookRecommendation, ItemId, MovieRecommendation, Recommendation,
};
use crate::wizard::Domain;

/// What to show when a recommendation request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Substitute the five sample recommendations for the domain
    #[default]
    Sample,
    /// Show an empty result list with the service-unavailable notice
    None,
}

impl FallbackPolicy {
    pub fn records(&self, domain: Domain) -> Vec<Recommendation> {
        match self {
            Self::Sample => sample_recommendations(domain),
            Self::None => Vec::new(),
        }
    }
}

/// The fixed five-item sample list for a domain.
pub fn sample_recommendations(domain: Domain) -> Vec<Recommendation> {
    match domain {
        Domain::Books => sample_books(),
        Domain::Anime => sample_anime(),
        Domain::Movies => sample_movies(),
    }
}

fn book(id: i64, title: &str, author: &str, year: i32, rating: f64, image: &str) -> Recommendation {
    Recommendation::Book(BookRecommendation {
        id: ItemId::Number(id),
        title: title.to_string(),
        author: Some(author.to_string()),
        year: Some(year),
        rating: Some(rating),
        image: Some(image.to_string()),
    })
}

fn anime(id: i64, title: &str, studio: &str, year: i32, rating: f64, image: &str) -> Recommendation {
    Recommendation::Anime(AnimeRecommendation {
        id: ItemId::Number(id),
        title: title.to_string(),
        studio: Some(studio.to_string()),
        year: Some(year),
        rating: Some(rating),
        image: Some(image.to_string()),
        genre: None,
    })
}

fn movie(id: &str, title: &str, year: i32, rating: f64, genre: &str) -> Recommendation {
    Recommendation::Movie(MovieRecommendation {
        id: ItemId::Text(id.to_string()),
        title: title.to_string(),
        media_type: String::from("movie"),
        year: Some(year),
        rating,
        genre: Some(genre.to_string()),
        image: None,
    })
}

fn sample_books() -> Vec<Recommendation> {
    vec![
        book(
            1,
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            1925,
            4.8,
            "https://images-na.ssl-images-amazon.com/images/I/71FTb9X6wsL.jpg",
        ),
        book(
            2,
            "To Kill a Mockingbird",
            "Harper Lee",
            1960,
            4.9,
            "https://images-na.ssl-images-amazon.com/images/I/81f7o6uZjFL.jpg",
        ),
        book(
            3,
            "1984",
            "George Orwell",
            1949,
            4.7,
            "https://images-na.ssl-images-amazon.com/images/I/71kxa1-0mfL.jpg",
        ),
        book(
            4,
            "Pride and Prejudice",
            "Jane Austen",
            1813,
            4.9,
            "https://images-na.ssl-images-amazon.com/images/I/71Q1tPupKjL.jpg",
        ),
        book(
            5,
            "The Catcher in the Rye",
            "J.D. Salinger",
            1951,
            4.8,
            "https://images-na.ssl-images-amazon.com/images/I/91HPG31dTwL.jpg",
        ),
    ]
}

fn sample_anime() -> Vec<Recommendation> {
    vec![
        anime(
            1,
            "Death Note",
            "Madhouse",
            2006,
            8.6,
            "https://cdn.myanimelist.net/images/anime/9/9453.jpg",
        ),
        anime(
            2,
            "Fullmetal Alchemist: Brotherhood",
            "Bones",
            2009,
            9.1,
            "https://cdn.myanimelist.net/images/anime/1223/96541.jpg",
        ),
        anime(
            3,
            "Attack on Titan",
            "Wit Studio",
            2013,
            8.5,
            "https://cdn.myanimelist.net/images/anime/10/47347.jpg",
        ),
        anime(
            4,
            "One Punch Man",
            "Madhouse",
            2015,
            8.7,
            "https://cdn.myanimelist.net/images/anime/12/76049.jpg",
        ),
        anime(
            5,
            "My Hero Academia",
            "Bones",
            2016,
            8.2,
            "https://cdn.myanimelist.net/images/anime/10/78745.jpg",
        ),
    ]
}

fn sample_movies() -> Vec<Recommendation> {
    vec![
        movie("tt0111161", "The Shawshank Redemption", 1994, 9.3, "Drama"),
        movie("tt0068646", "The Godfather", 1972, 9.2, "Crime,Drama"),
        movie("tt0468569", "The Dark Knight", 2008, 9.0, "Action,Crime,Drama"),
        movie(
            "tt0167260",
            "The Lord of the Rings: The Return of the King",
            2003,
            8.9,
            "Action,Adventure,Drama",
        ),
        movie(
            "tt0120737",
            "The Lord of the Rings: The Fellowship of the Ring",
            2001,
            8.8,
            "Action,Adventure,Drama",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_domain_has_five_samples() {
        for domain in [Domain::Books, Domain::Anime, Domain::Movies] {
            assert_eq!(sample_recommendations(domain).len(), 5);
        }
    }

    #[test]
    fn test_book_samples() {
        let books = sample_recommendations(Domain::Books);
        let ids: Vec<String> = books.iter().map(|b| b.id().to_string()).collect();

        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(books[0].title(), "The Great Gatsby");
    }

    #[test]
    fn test_movie_samples_keep_imdb_ids() {
        let movies = sample_recommendations(Domain::Movies);
        assert_eq!(movies[0].id().to_string(), "tt0111161");
        assert_eq!(movies[2].rating_label().as_deref(), Some("9.0"));
    }

    #[test]
    fn test_none_policy_is_empty() {
        assert!(FallbackPolicy::None.records(Domain::Anime).is_empty());
        assert_eq!(FallbackPolicy::Sample.records(Domain::Anime).len(), 5);
    }
}
