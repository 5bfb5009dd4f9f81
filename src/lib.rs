pub mod dataloader;
