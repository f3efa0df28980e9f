//! # Embedder — Sentence Embeddings via candle
//!
//! O [`Embedder`] carrega um modelo BERT de sentence embeddings
//! (por padrão `sentence-transformers/all-MiniLM-L6-v2`, 384 dimensões)
//! e o executa em CPU com `candle`.
//!
//! ## Pipeline de Embedding
//!
//! ```text
//! Texto → Tokenizer → Token IDs → BERT Forward Pass → Mean Pooling → L2 Normalize
//!                                                          ↓
//!                                                    Vec<f32> (384-dim)
//! ```
//!
//! ## Carregamento do Modelo
//!
//! Baixado do HuggingFace Hub na primeira execução e cacheado em
//! `~/.cache/huggingface/`. Estratégia de fallback:
//!
//! | Componente | Preferido | Fallback |
//! |-----------|-----------|----------|
//! | Tokenizer | `tokenizer.json` | `vocab.txt` (WordPiece) |
//! | Pesos | `model.safetensors` | `pytorch_model.bin` |

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert;
use hf_hub::api::sync::Api;
use tokenizers::{Tokenizer, TruncationParams};

use super::TextEmbedder;
use crate::error::ReasonerError;

/// Repositório padrão do modelo de embeddings.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Limite de tokens por texto (abstracts longos são truncados).
const MAX_TOKENS: usize = 256;

/// Modelo BERT + tokenizer + device (sempre CPU).
///
/// Imutável após [`Embedder::load()`]; seguro para uso concorrente.
pub struct Embedder {
    model: bert::BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl Embedder {
    /// Carrega o modelo `repo_id` do HuggingFace Hub.
    ///
    /// Operação de I/O pesada (download na primeira vez, leitura de pesos),
    /// por isso o `main.rs` a executa em `spawn_blocking`.
    ///
    /// # Erros
    ///
    /// Retorna erro se o Hub estiver inacessível ou os arquivos corrompidos.
    pub fn load(repo_id: &str) -> Result<Self> {
        let device = Device::Cpu;
        tracing::info!("Loading embedding model ({}) from HuggingFace Hub...", repo_id);
        let api = Api::new().context("Failed to create HF Hub API")?;
        let repo = api.model(repo_id.to_string());

        // ─── Tokenizer ────────────────────────────────────────────
        let config_path = repo
            .get("config.json")
            .context("Failed to download config.json")?;
        let mut tokenizer = match repo.get("tokenizer.json") {
            Ok(tokenizer_path) => {
                tracing::info!("Loading tokenizer from tokenizer.json...");
                Tokenizer::from_file(&tokenizer_path).map_err(|e| anyhow::anyhow!("{}", e))?
            }
            Err(_) => {
                tracing::info!("tokenizer.json not available, building WordPiece from vocab.txt...");
                let vocab_path = repo
                    .get("vocab.txt")
                    .context("Failed to download vocab.txt")?;
                Self::build_bert_tokenizer(
                    vocab_path
                        .to_str()
                        .context("Invalid vocab.txt path encoding")?,
                )?
            }
        };
        // O tokenizer.json do MiniLM vem com padding fixo; o batch faz o próprio padding.
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        // ─── Config do modelo ─────────────────────────────────────
        let config_str = std::fs::read_to_string(&config_path)?;
        let config: bert::Config =
            serde_json::from_str(&config_str).context("Failed to parse model config")?;

        // ─── Pesos do modelo ──────────────────────────────────────
        tracing::info!("Loading model weights...");
        let vb = match repo.get("model.safetensors") {
            Ok(safetensors_path) => unsafe {
                VarBuilder::from_mmaped_safetensors(&[safetensors_path], DType::F32, &device)
                    .context("Failed to load safetensors weights")?
            },
            Err(_) => {
                tracing::info!("Falling back to pytorch_model.bin...");
                let weights_path = repo
                    .get("pytorch_model.bin")
                    .context("Failed to download pytorch_model.bin")?;
                VarBuilder::from_pth(&weights_path, DType::F32, &device)
                    .context("Failed to load pytorch weights")?
            }
        };

        let model = bert::BertModel::load(vb, &config).context("Failed to load BERT model")?;

        tracing::info!("Embedding model loaded on {:?}", device);
        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Tokenizer WordPiece a partir de `vocab.txt`, sem `tokenizer.json`.
    ///
    /// O MiniLM é *uncased*: o normalizer converte para minúsculas.
    fn build_bert_tokenizer(vocab_path: &str) -> Result<Tokenizer> {
        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path)
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::new(true, true, None, true)));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
        tokenizer.with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), 102),
            ("[CLS]".to_string(), 101),
        )));

        Ok(tokenizer)
    }

    /// Embedding de um texto: mean pooling pela attention mask + L2.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut batch = self.encode_batch(&[text.to_string()])?;
        batch.pop().context("Empty embedding batch")
    }

    /// Embeddings de vários textos em uma única forward pass.
    ///
    /// Textos mais curtos recebem padding até o maior do batch; a
    /// attention mask impede que o padding influencie o pooling.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings: Vec<_> = texts
            .iter()
            .map(|t| {
                self.tokenizer
                    .encode(t.as_str(), true)
                    .map_err(|e| anyhow::anyhow!("Tokenizer error: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let batch_size = encodings.len();
        let mut all_ids = vec![0u32; batch_size * max_len];
        let all_type_ids = vec![0u32; batch_size * max_len];
        let mut all_mask = vec![0u32; batch_size * max_len];

        for (i, enc) in encodings.iter().enumerate() {
            let offset = i * max_len;
            for (j, (&id, &mask)) in enc.get_ids().iter().zip(enc.get_attention_mask()).enumerate() {
                all_ids[offset + j] = id;
                all_mask[offset + j] = mask;
            }
        }

        let input_ids = Tensor::from_vec(all_ids, (batch_size, max_len), &self.device)?;
        let token_type_ids = Tensor::from_vec(all_type_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(all_mask, (batch_size, max_len), &self.device)?;

        // [batch_size, max_len, hidden]
        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // ─── Mean Pooling ─────────────────────────────────────────
        let mask_expanded = attention_mask
            .unsqueeze(2)?
            .to_dtype(DType::F32)?
            .broadcast_as(output.shape())?;
        let summed = (output * mask_expanded.clone())?.sum(1)?;
        let mask_sum = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;
        let pooled = (summed / mask_sum)?;

        // ─── L2 Normalize ─────────────────────────────────────────
        let norm = pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
        let normalized = pooled.broadcast_div(&norm)?;

        let mut results = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            results.push(normalized.get(i)?.to_vec1::<f32>()?);
        }
        Ok(results)
    }
}

impl TextEmbedder for Embedder {
    fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
        self.encode(text)
            .map_err(|e| ReasonerError::Embedding(e.to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
        self.encode_batch(texts)
            .map_err(|e| ReasonerError::Embedding(e.to_string()))
    }
}
