//! # Cliente PubMed (NCBI E-utilities)
//!
//! Busca em duas etapas:
//!
//! ```text
//! 1. esearch.fcgi?db=pubmed&term=..&retmax=..&usehistory=y  → WebEnv + QueryKey
//! 2. efetch.fcgi?db=pubmed&query_key=..&WebEnv=..&retmode=xml → <PubmedArticle>*
//! ```
//!
//! Sem `WebEnv`/`QueryKey` na resposta da busca, o resultado é vazio.
//! Status HTTP diferente de 2xx é erro ([`ReasonerError::Literature`]).
//!
//! O cliente HTTP é **bloqueante**: chame-o fora do runtime async
//! (ex: dentro de `spawn_blocking`).

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client;

use super::{LiteratureSource, Paper};
use crate::error::{ReasonerError, Result};

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const ARTICLE_BASE: &str = "https://pubmed.ncbi.nlm.nih.gov";

pub struct PubMedClient {
    client: Client,
    base_url: String,
}

impl PubMedClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(EUTILS_BASE)
    }

    /// Aponta para outro endpoint compatível (espelho, mock local).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("abductive-reasoner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn get(&self, endpoint: &str, stage: &'static str, params: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(params)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(stage, status = status.as_u16(), "PubMed request failed");
            return Err(ReasonerError::Literature {
                stage,
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

impl LiteratureSource for PubMedClient {
    fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Paper>> {
        let retmax = max_results.to_string();
        let search = self.get(
            "esearch.fcgi",
            "search",
            &[("db", "pubmed"), ("term", query), ("retmax", retmax.as_str()), ("usehistory", "y")],
        )?;
        let Some(handle) = parse_search(&search)? else {
            tracing::warn!(query, "No WebEnv or QueryKey found in search response");
            return Ok(Vec::new());
        };

        let articles = self.get(
            "efetch.fcgi",
            "fetch",
            &[
                ("db", "pubmed"),
                ("query_key", handle.query_key.as_str()),
                ("WebEnv", handle.web_env.as_str()),
                ("retmax", retmax.as_str()),
                ("retmode", "xml"),
            ],
        )?;
        let mut papers = parse_articles(&articles)?;
        papers.truncate(max_results);
        tracing::info!(query, papers = papers.len(), "PubMed papers fetched");
        Ok(papers)
    }
}

/// Referência ao histórico de busca no servidor NCBI.
#[derive(Debug, PartialEq)]
pub struct SearchHandle {
    pub web_env: String,
    pub query_key: String,
}

/// Extrai `WebEnv` e `QueryKey` da resposta do eSearch.
pub fn parse_search(xml: &str) -> Result<Option<SearchHandle>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current = String::new();
    let mut web_env = None;
    let mut query_key = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => current = String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            Event::End(_) => current.clear(),
            Event::Text(t) => {
                let text = t.unescape().map_err(quick_xml::Error::from)?;
                match current.as_str() {
                    "WebEnv" if web_env.is_none() => web_env = Some(text.into_owned()),
                    "QueryKey" if query_key.is_none() => query_key = Some(text.into_owned()),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(web_env.zip(query_key).map(|(web_env, query_key)| SearchHandle { web_env, query_key }))
}

/// Artigo em construção enquanto o XML do eFetch é percorrido.
#[derive(Default)]
struct ArticleBuilder {
    pmid: String,
    title: String,
    abstract_text: String,
    abstract_done: bool,
    authors: Vec<String>,
    author: Option<(String, String)>,
    pub_date: Vec<String>,
    pub_date_done: bool,
}

impl ArticleBuilder {
    fn absorb(&mut self, stack: &[String], text: &str) {
        let inside = |tag: &str| stack.iter().any(|s| s == tag);
        let top = stack.last().map(String::as_str).unwrap_or_default();

        if top == "PMID" && self.pmid.is_empty() {
            self.pmid = text.to_string();
        } else if inside("ArticleTitle") {
            append(&mut self.title, text);
        } else if inside("AbstractText") && !self.abstract_done {
            append(&mut self.abstract_text, text);
        } else if let Some((last, fore)) = self.author.as_mut() {
            match top {
                "LastName" => *last = text.to_string(),
                "ForeName" => *fore = text.to_string(),
                _ => {}
            }
        } else if inside("PubDate") && !self.pub_date_done {
            if matches!(top, "Year" | "Month" | "Day" | "MedlineDate") {
                self.pub_date.push(text.to_string());
            }
        }
    }

    fn close_author(&mut self) {
        match self.author.take() {
            Some((last, fore)) if !last.is_empty() && !fore.is_empty() => {
                self.authors.push(format!("{fore} {last}"))
            }
            Some((last, _)) if !last.is_empty() => self.authors.push(last),
            _ => {}
        }
    }

    fn finish(self) -> Paper {
        let link = if self.pmid.is_empty() {
            String::new()
        } else {
            format!("{ARTICLE_BASE}/{}", self.pmid)
        };
        Paper {
            title: or_default(self.title, "No title available"),
            abstract_text: or_default(self.abstract_text, "No abstract available"),
            published: or_default(self.pub_date.join(" "), "Unknown"),
            authors: self.authors,
            pmid: self.pmid,
            link,
        }
    }
}

fn append(buf: &mut String, text: &str) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(text);
}

fn or_default(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Converte a resposta XML do eFetch em artigos, na ordem do documento.
pub fn parse_articles(xml: &str) -> Result<Vec<Paper>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut papers = Vec::new();
    let mut current: Option<ArticleBuilder> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "PubmedArticle" {
                    current = Some(ArticleBuilder::default());
                } else if let (Some(article), "Author") = (current.as_mut(), name.as_str()) {
                    article.author = Some(Default::default());
                }
                stack.push(name);
            }
            Event::End(e) => {
                stack.pop();
                let name = e.name();
                if name.as_ref() == b"PubmedArticle" {
                    if let Some(article) = current.take() {
                        papers.push(article.finish());
                    }
                } else if let Some(article) = current.as_mut() {
                    match name.as_ref() {
                        b"Author" => article.close_author(),
                        b"AbstractText" => article.abstract_done = true,
                        b"PubDate" => article.pub_date_done = true,
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if let Some(article) = current.as_mut() {
                    let text = t.unescape().map_err(quick_xml::Error::from)?;
                    article.absorb(&stack, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult><Count>42</Count><RetMax>2</RetMax><QueryKey>1</QueryKey>
<WebEnv>MCID_abc123</WebEnv><IdList><Id>111</Id><Id>222</Id></IdList></eSearchResult>"#;

    const FETCH: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
 <PubmedArticle>
  <MedlineCitation>
   <PMID Version="1">111</PMID>
   <Article>
    <Journal><JournalIssue><PubDate><Year>2021</Year><Month>Mar</Month></PubDate></JournalIssue></Journal>
    <ArticleTitle>Stress &amp; the <i>hippocampus</i>.</ArticleTitle>
    <Abstract>
     <AbstractText Label="BACKGROUND">Chronic stress elevates cortisol.</AbstractText>
     <AbstractText Label="RESULTS">Second section.</AbstractText>
    </Abstract>
    <AuthorList>
     <Author><LastName>Silva</LastName><ForeName>Ana</ForeName></Author>
     <Author><LastName>Costa</LastName></Author>
     <Author><CollectiveName>Stress Consortium</CollectiveName></Author>
    </AuthorList>
   </Article>
  </MedlineCitation>
  <PubmedData><ReferenceList><Reference><ArticleIdList><ArticleId>999</ArticleId></ArticleIdList></Reference></ReferenceList></PubmedData>
 </PubmedArticle>
 <PubmedArticle>
  <MedlineCitation><PMID>222</PMID><Article></Article></MedlineCitation>
 </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn search_handle_is_extracted() {
        let handle = parse_search(SEARCH).unwrap().unwrap();
        assert_eq!(
            handle,
            SearchHandle {
                web_env: "MCID_abc123".into(),
                query_key: "1".into()
            }
        );
    }

    #[test]
    fn search_without_history_yields_none() {
        let xml = "<eSearchResult><Count>0</Count><ERROR>Empty term</ERROR></eSearchResult>";
        assert_eq!(parse_search(xml).unwrap(), None);
    }

    #[test]
    fn articles_are_parsed_in_order() {
        let papers = parse_articles(FETCH).unwrap();
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.pmid, "111");
        assert_eq!(first.title, "Stress & the hippocampus .");
        assert_eq!(first.abstract_text, "Chronic stress elevates cortisol.");
        assert_eq!(first.authors, vec!["Ana Silva", "Costa"]);
        assert_eq!(first.published, "2021 Mar");
        assert_eq!(first.link, "https://pubmed.ncbi.nlm.nih.gov/111");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let papers = parse_articles(FETCH).unwrap();
        let second = &papers[1];
        assert_eq!(second.title, "No title available");
        assert_eq!(second.abstract_text, "No abstract available");
        assert_eq!(second.published, "Unknown");
        assert!(second.authors.is_empty());
    }

    #[test]
    fn empty_set_has_no_papers() {
        assert!(parse_articles("<PubmedArticleSet></PubmedArticleSet>").unwrap().is_empty());
    }
}
