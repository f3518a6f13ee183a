use super::{sparse, tags};
use crate::config::DatasetConfig;
use crate::error::Result;
use crate::matrix::InteractionMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Loaders for the on-disk CiteULike-style dataset described by a
/// [`DatasetConfig`].
pub struct Dataset<'a> {
    config: &'a DatasetConfig,
}

impl<'a> Dataset<'a> {
    pub fn new(config: &'a DatasetConfig) -> Self {
        Self { config }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.config.data_folder.join(file)
    }

    /// `num_users x num_articles` matrix; 1 where user `u` liked article `a`.
    pub fn load_user_article_likes(&self) -> Result<InteractionMatrix> {
        let path = self.path(&self.config.likes_file);
        log::info!("Loading user likes from {}", path.display());
        sparse::load_sparse_matrix_file(&path, self.config.num_users, self.config.num_articles)
    }

    /// Square `num_articles x num_articles` matrix; 1 where article `a` cites `b`.
    pub fn load_citations(&self) -> Result<InteractionMatrix> {
        let path = self.path(&self.config.citations_file);
        log::info!("Loading citations from {}", path.display());
        sparse::load_sparse_matrix_file(&path, self.config.num_articles, self.config.num_articles)
    }

    /// Tag names; a tag's id is its position in the list.
    pub fn load_tags(&self) -> Result<Vec<String>> {
        let path = self.path(&self.config.tags_file);
        log::info!("Loading tag vocabulary from {}", path.display());
        tags::load_tags(BufReader::new(File::open(&path)?))
    }

    /// Tag ids per article, in article order.
    pub fn load_article_tags(&self) -> Result<Vec<Vec<usize>>> {
        let path = self.path(&self.config.item_tags_file);
        log::info!("Loading article tags from {}", path.display());
        let lists = sparse::load_adjacency(BufReader::new(File::open(&path)?))?;
        if let Some(num_tags) = self.config.num_tags {
            tags::check_tag_ids(&lists, num_tags)?;
        }
        Ok(lists)
    }
}
