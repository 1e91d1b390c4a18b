use super::core::Collection;
use crate::document::Document;
use crate::types::DocumentId;

impl Collection {
    /// Inserts or replaces the document under its id. Replacement keeps the original position.
    pub fn insert_document(&self, document: Document) -> DocumentId {
        let doc_id = document.id;
        let mut slots = self.slots.write();
        if slots.docs.insert(doc_id, document).is_none() {
            slots.order.push(doc_id);
        } else {
            log::debug!("replaced document {} in {}", doc_id, self.name_str());
        }
        doc_id
    }

    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.slots.read().docs.get(id).cloned()
    }

    pub fn update_document(&self, id: &DocumentId, new_data: bson::Document) -> bool {
        let mut slots = self.slots.write();
        match slots.docs.get_mut(id) {
            Some(doc) => {
                doc.update(new_data);
                true
            }
            None => false,
        }
    }

    pub fn delete_document(&self, id: &DocumentId) -> bool {
        let mut slots = self.slots.write();
        if slots.docs.remove(id).is_some() {
            slots.order.retain(|x| x != id);
            true
        } else {
            false
        }
    }

    /// All documents in insertion order.
    pub fn get_all_documents(&self) -> Vec<Document> {
        let slots = self.slots.read();
        slots.order.iter().filter_map(|id| slots.docs.get(id).cloned()).collect()
    }

    /// Return only the IDs of all documents without cloning each document.
    pub fn list_ids(&self) -> Vec<DocumentId> {
        self.slots.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.slots.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
