//! Shared `SHOW CREATE TABLE` fixtures for integration tests.

#![allow(dead_code)]

use mysqldiff_core::{DdlParser, TableDescriptor};

pub const USERS_V1: &str = "CREATE TABLE `users` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `email` varchar(255) NOT NULL,
  `nickname` varchar(30) DEFAULT NULL,
  PRIMARY KEY (`id`),
  KEY `idx_nickname` (`nickname`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

pub const USERS_V2: &str = "CREATE TABLE `users` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `email` varchar(320) NOT NULL,
  `name` varchar(50) DEFAULT NULL,
  `created_at` datetime NOT NULL DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_email` (`email`),
  KEY `idx_created_at` (`created_at`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

pub const POSTS: &str = "CREATE TABLE `posts` (
  `id` bigint NOT NULL,
  `user_id` int(11) NOT NULL,
  `title` varchar(200) NOT NULL,
  PRIMARY KEY (`id`),
  KEY `idx_user` (`user_id`),
  CONSTRAINT `fk_posts_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

pub const LEGACY: &str = "CREATE TABLE `legacy` (
  `payload` text
) ENGINE=MyISAM";

/// Parses each fixture, panicking on malformed input.
pub fn tables(ddls: &[&str]) -> Vec<TableDescriptor> {
    let parser = DdlParser::new();
    ddls.iter()
        .map(|ddl| parser.parse(ddl).expect("fixture should parse"))
        .collect()
}
