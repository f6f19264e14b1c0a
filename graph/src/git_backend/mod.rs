mod repo;

pub use repo::GitRepository;
