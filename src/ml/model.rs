use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct NcfConfig {
    pub num_users:     usize,
    pub num_movies:    usize,
    pub embedding_dim: usize,
    pub hidden1:       usize,
    pub hidden2:       usize,
    pub dropout:       f64,
}

impl NcfConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> NcfModel<B> {
        let user_embedding  = EmbeddingConfig::new(self.num_users,  self.embedding_dim).init(device);
        let movie_embedding = EmbeddingConfig::new(self.num_movies, self.embedding_dim).init(device);
        // The two flattened embeddings are concatenated before the dense stack
        let fc1     = LinearConfig::new(self.embedding_dim * 2, self.hidden1).init(device);
        let fc2     = LinearConfig::new(self.hidden1, self.hidden2).init(device);
        let output  = LinearConfig::new(self.hidden2, 1).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        NcfModel {
            user_embedding, movie_embedding,
            fc1, fc2, output, dropout,
            embedding_dim: self.embedding_dim,
        }
    }
}

#[derive(Module, Debug)]
pub struct NcfModel<B: Backend> {
    pub user_embedding:  Embedding<B>,
    pub movie_embedding: Embedding<B>,
    pub fc1:             Linear<B>,
    pub fc2:             Linear<B>,
    pub output:          Linear<B>,
    pub dropout:         Dropout,
    pub embedding_dim:   usize,
}

impl<B: Backend> NcfModel<B> {
    /// users, movies: [batch, 1] → predictions in (0, 1): [batch]
    pub fn forward(
        &self,
        users:  Tensor<B, 2, Int>,
        movies: Tensor<B, 2, Int>,
    ) -> Tensor<B, 1> {
        let [batch_size, _] = users.dims();

        // Embedding lookup gives [batch, 1, dim]; flatten to [batch, dim]
        let user_vecs = self.user_embedding.forward(users)
            .reshape([batch_size, self.embedding_dim]);
        let movie_vecs = self.movie_embedding.forward(movies)
            .reshape([batch_size, self.embedding_dim]);

        // One fixed-length feature vector per (user, movie) pair
        let features = Tensor::cat(vec![user_vecs, movie_vecs], 1);

        let x = relu(self.fc1.forward(features));
        let x = self.dropout.forward(x);
        let x = relu(self.fc2.forward(x));
        let x = self.dropout.forward(x);

        // Single sigmoid unit keeps predictions on the normalized
        // rating scale — the same [0, 1] range as the targets
        let logits = self.output.forward(x); // [batch, 1]
        sigmoid(logits).reshape([batch_size])
    }

    /// Forward pass plus MSE against the normalized targets.
    /// Works on both the autodiff and the plain backend, so the
    /// same code path serves training and holdout evaluation.
    pub fn forward_loss(
        &self,
        users:   Tensor<B, 2, Int>,
        movies:  Tensor<B, 2, Int>,
        targets: Tensor<B, 1>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let predictions = self.forward(users, movies);
        let loss = MseLoss::new().forward(
            predictions.clone(),
            targets,
            Reduction::Mean,
        );
        (loss, predictions)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn tiny_model(device: &burn::backend::ndarray::NdArrayDevice) -> NcfModel<TestBackend> {
        NcfConfig::new(10, 20, 8, 16, 8, 0.0).init(device)
    }

    #[test]
    fn test_forward_gives_one_score_per_pair() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model  = tiny_model(&device);

        let users = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3].as_slice(), &device
        ).reshape([4, 1]);
        let movies = Tensor::<TestBackend, 1, Int>::from_ints(
            [5, 6, 7, 8].as_slice(), &device
        ).reshape([4, 1]);

        let preds = model.forward(users, movies);
        assert_eq!(preds.dims(), [4]);

        // Sigmoid output is strictly inside (0, 1)
        let values = preds.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|p| *p > 0.0 && *p < 1.0));
    }

    #[test]
    fn test_forward_loss_is_scalar() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model  = tiny_model(&device);

        let users = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1].as_slice(), &device
        ).reshape([2, 1]);
        let movies = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1].as_slice(), &device
        ).reshape([2, 1]);
        let targets = Tensor::<TestBackend, 1>::from_floats(
            [0.5, 1.0].as_slice(), &device
        );

        let (loss, preds) = model.forward_loss(users, movies, targets);
        assert_eq!(loss.dims(),  [1]);
        assert_eq!(preds.dims(), [2]);
    }
}
